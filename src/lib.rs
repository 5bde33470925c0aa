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

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

//! basE91 binary-to-text encoding.
//!
//! Arbitrary bytes are packed into 13- or 14-bit groups, and each group is
//! written as two characters from a fixed alphabet of 91 printable ASCII
//! characters. The output is about 1.23 times the size of the input, compared
//! with 1.33 for base64.
//!
//! Encoding and decoding are lazy iterators over their input, so any
//! [`Iterator`] of bytes (or chars) can be converted without buffering. The
//! [`stream`] module provides push-based adapters for input that arrives in
//! chunks, and [`io`] wraps those adapters in [`std::io::Write`] sinks.
//!
//! Decoding never fails: characters outside the alphabet, such as whitespace
//! or line breaks, are skipped.
//!
//! ```
//! # #[cfg(feature = "alloc")]
//! # {
//! let encoded = base91::encode("Hello World!");
//! assert_eq!(encoded, ">OwJh>Io0Tv!8PE");
//! assert_eq!(base91::decode(&encoded), b"Hello World!");
//! # }
//! ```

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg_attr(feature = "alloc", macro_use)]
extern crate log;

pub mod alphabet;
pub mod decode;
pub mod encode;
#[cfg(feature = "alloc")]
mod error;
#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
pub mod io;
mod iter;
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub mod stream;
#[cfg(feature = "text")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "text")))]
pub mod text;

/// Number of symbols in the alphabet.
const BASE: u32 = 91;

/// Largest 13-bit group that must be widened to 14 bits. Values 0..=88 would
/// leave the high digit unused, so the group takes one more bit instead.
const MAX_NARROW: u32 = 88;

const MASK_13: u32 = 0x1fff;
const MASK_14: u32 = 0x3fff;

/// Returns the number of bits a two-symbol group occupies, based on its low
/// 13 bits.
const fn group_width(value: u32) -> u32 {
    if value & MASK_13 > MAX_NARROW {
        13
    } else {
        14
    }
}

pub use alphabet::Digit;
pub use alphabet::ALPHABET;

pub use decode::decode_bytes;
pub use decode::decode_chars;
pub use decode::decode_str;
#[cfg(feature = "alloc")]
pub use decode::{decode, decode_to_vec};

pub use encode::encode_to_bytes;
pub use encode::encode_to_chars;
pub use encode::max_encoded_len;
#[cfg(feature = "alloc")]
pub use encode::{encode, encode_to_string};

#[cfg(feature = "alloc")]
pub use error::Error;

#[cfg(feature = "alloc")]
pub use stream::{DecodeStream, EncodeStream};
