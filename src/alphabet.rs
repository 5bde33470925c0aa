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

//! The basE91 alphabet and its reverse lookup.

use core::convert::TryFrom;
use core::fmt::{self, Debug, Display, Formatter};

use super::BASE;

/// The 91 characters used by basE91, ordered by value.
pub const ALPHABET: [u8; BASE as usize] = *b"\
    ABCDEFGHIJKLMNOPQRSTUVWXYZ\
    abcdefghijklmnopqrstuvwxyz\
    0123456789\
    !#$%&()*+,./:;<=>?@[]^_`{|}~\"";

const INVALID: u8 = u8::MAX;

/// Maps every byte value to its index in [`ALPHABET`], or [`INVALID`].
static REVERSE: [u8; 256] = reverse_table();

const fn reverse_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// A single basE91 digit: an index into [`ALPHABET`], always less than 91.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digit(u8);

impl Digit {
    /// Returns the digit with value `x`, or [`None`] if `x` is 91 or more.
    pub const fn new(x: u8) -> Option<Self> {
        if (x as u32) < BASE {
            Some(Self(x))
        } else {
            None
        }
    }

    /// Returns the digit for `n % 91`.
    pub(crate) const fn from_rem(n: u32) -> Self {
        Self((n % BASE) as u8)
    }

    /// Splits a group value into its low and high digits.
    pub(crate) fn split(value: u32) -> [Self; 2] {
        debug_assert!(value < BASE * BASE);
        [Self::from_rem(value), Self::from_rem(value / BASE)]
    }

    /// Looks up an ASCII character in the alphabet.
    ///
    /// Returns [`None`] for every byte that is not one of the 91 alphabet
    /// characters, including all non-ASCII bytes.
    pub fn from_ascii(b: u8) -> Option<Self> {
        match REVERSE[usize::from(b)] {
            INVALID => None,
            i => Some(Self(i)),
        }
    }

    /// Looks up a character in the alphabet.
    pub fn from_char(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_ascii)
    }

    /// The numeric value of this digit.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The alphabet character for this digit, as an ASCII byte.
    pub const fn to_ascii(self) -> u8 {
        ALPHABET[self.0 as usize]
    }

    /// The alphabet character for this digit.
    pub const fn to_char(self) -> char {
        self.to_ascii() as char
    }
}

impl From<Digit> for u8 {
    fn from(d: Digit) -> u8 {
        d.0
    }
}

impl From<Digit> for u32 {
    fn from(d: Digit) -> u32 {
        u32::from(d.0)
    }
}

impl Debug for Digit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Digit({}, {:?})", self.0, self.to_char())
    }
}

impl Display for Digit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Returns whether `c` is one of the 91 alphabet characters.
pub fn is_alphabet_char(c: char) -> bool {
    Digit::from_char(c).is_some()
}
