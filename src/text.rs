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

//! Conversion between text in named character encodings and basE91.
//!
//! The core encoder works on bytes. The functions here accept either bytes
//! or text and convert text with a named encoding first, using the
//! [WHATWG encoding labels][labels] understood by [`encoding_rs`]
//! (`"utf-8"`, `"latin1"`, `"shift_jis"`, ...). The default is UTF-8.
//!
//! ```
//! use base91::text::{decode_output, encode_input, Input, Output};
//!
//! let encoded = encode_input(Some(Input::Text("été")), Some("latin1"))?;
//! assert_eq!(encoded, ";6vU");
//! let decoded = decode_output(Some(encoded.as_str()), Some("latin1"))?;
//! assert_eq!(decoded, Output::Text("été".into()));
//! # Ok::<(), base91::Error>(())
//! ```
//!
//! [labels]: https://encoding.spec.whatwg.org/#names-and-labels

use super::{decode, encode, Error};

use alloc::borrow::{Cow, ToOwned};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};

use encoding_rs::Encoding;

/// A character encoding used to convert between text and bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// Looks up an encoding by label. Labels are case-insensitive and
    /// surrounding whitespace is ignored.
    pub fn for_label(label: &str) -> Result<Self, Error> {
        Encoding::for_label_no_replacement(label.as_bytes())
            .map(Self)
            .ok_or_else(|| Error::UnknownTextEncoding(label.to_owned()))
    }

    /// UTF-8, the default encoding.
    pub fn utf8() -> Self {
        Self(encoding_rs::UTF_8)
    }

    /// The canonical name of this encoding.
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Converts text to bytes in this encoding.
    ///
    /// Characters that can't be represented are written as HTML numeric
    /// character references. UTF-16 encodings can only be decoded, so text
    /// is written as UTF-8 instead.
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        self.0.encode(text).0
    }

    /// Converts bytes in this encoding to text.
    ///
    /// Malformed sequences are replaced with U+FFFD. A byte order mark is
    /// treated as data.
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        self.0.decode_without_bom_handling(bytes).0
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl Debug for TextEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

fn lookup(label: Option<&str>) -> Result<TextEncoding, Error> {
    label.map_or_else(|| Ok(TextEncoding::default()), TextEncoding::for_label)
}

/// Data to encode: raw bytes, or text to be converted to bytes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

/// Decoded data: raw bytes, or text if an output encoding was requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Output {
    Bytes(Vec<u8>),
    Text(String),
}

impl Output {
    /// The decoded bytes, or the text's UTF-8 bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }
}

/// Encodes `data` as basE91.
///
/// Text is first converted to bytes with `encoding` (UTF-8 if [`None`]).
/// The encoding label is checked even when `data` is already bytes.
///
/// # Errors
///
/// [`Error::MissingInput`] if `data` is [`None`], and
/// [`Error::UnknownTextEncoding`] if `encoding` isn't a known label.
pub fn encode_input(
    data: Option<Input<'_>>,
    encoding: Option<&str>,
) -> Result<String, Error> {
    let encoding = lookup(encoding)?;
    Ok(match data.ok_or(Error::MissingInput)? {
        Input::Bytes(bytes) => encode(bytes),
        Input::Text(text) => encode(encoding.encode(text)),
    })
}

/// Decodes basE91 text.
///
/// If `encoding` is [`None`], the raw bytes are returned; otherwise they are
/// converted to text with that encoding. A missing input decodes the same as
/// an empty one.
///
/// # Errors
///
/// [`Error::UnknownTextEncoding`] if `encoding` isn't a known label.
pub fn decode_output(
    text: Option<&str>,
    encoding: Option<&str>,
) -> Result<Output, Error> {
    let encoding = encoding.map(TextEncoding::for_label).transpose()?;
    let bytes = decode(text.unwrap_or_default());
    Ok(match encoding {
        None => Output::Bytes(bytes),
        Some(encoding) => Output::Text(encoding.decode(&bytes).into_owned()),
    })
}

/// Converts `text` to bytes with the named encoding and encodes them.
pub fn encode_text(text: &str, encoding: &str) -> Result<String, Error> {
    encode_input(Some(Input::Text(text)), Some(encoding))
}

/// Decodes basE91 `text` and converts the bytes to text with the named
/// encoding.
pub fn decode_text(text: &str, encoding: &str) -> Result<String, Error> {
    let encoding = TextEncoding::for_label(encoding)?;
    Ok(encoding.decode(&decode(text)).into_owned())
}
