/*
 * Copyright (C) 2022 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base91.
 *
 * base91 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base91 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base91. If not, see <https://www.gnu.org/licenses/>.
 */

use alloc::string::String;
use core::fmt::{self, Display, Formatter};

/// An error returned by the streaming and text-conversion APIs.
///
/// Decoding basE91 data itself never fails; see [`crate::decode`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// There was no data to encode.
    MissingInput,
    /// The named text encoding isn't supported.
    UnknownTextEncoding(String),
    /// Data was pushed to a stream after it was ended.
    StreamClosed,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::MissingInput => write!(f, "missing data to encode"),
            Self::UnknownTextEncoding(label) => {
                write!(f, "unknown text encoding: {:?}", label)
            }
            Self::StreamClosed => write!(f, "stream has already been ended"),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        use std::io::ErrorKind;
        let kind = match e {
            Error::StreamClosed => ErrorKind::BrokenPipe,
            _ => ErrorKind::InvalidInput,
        };
        Self::new(kind, e)
    }
}
