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

//! Functions and types for encoding basE91 data.

use super::iter::{Accumulator, Pump};
use super::Digit;
use super::{group_width, BASE, MASK_13, MASK_14};

use core::array;
use core::iter::{FusedIterator, Take};

#[cfg(feature = "alloc")]
use alloc::string::String;

/// Up to two ASCII symbols released by the encoder at once.
pub(crate) type Symbols = Take<array::IntoIter<u8, 2>>;

fn symbols(digits: [Digit; 2], len: usize) -> Symbols {
    IntoIterator::into_iter(digits.map(Digit::to_ascii)).take(len)
}

/// Bit accumulator for the encoder.
///
/// `queue` holds `bits` not-yet-encoded bits, least significant first. Since
/// at most 13 bits are left over after each byte, `queue` never holds more
/// than 21 bits.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EncodeState {
    queue: u32,
    bits: u32,
}

impl EncodeState {
    pub const fn new() -> Self {
        Self {
            queue: 0,
            bits: 0,
        }
    }

    /// Adds a byte to the queue and emits a two-symbol group if more than
    /// 13 bits are available.
    pub fn push(&mut self, byte: u8) -> Symbols {
        self.queue |= u32::from(byte) << self.bits;
        self.bits += 8;
        if self.bits <= 13 {
            return symbols([Digit::from_rem(0); 2], 0);
        }

        let width = group_width(self.queue);
        let mask = if width == 13 { MASK_13 } else { MASK_14 };
        let value = self.queue & mask;
        self.queue >>= width;
        self.bits -= width;
        symbols(Digit::split(value), 2)
    }

    /// Emits the remaining bits and resets the state.
    ///
    /// The second symbol is written if more than 7 bits remain or if the
    /// value doesn't fit in the first symbol alone.
    pub fn finish(&mut self) -> Symbols {
        let Self {
            queue,
            bits,
        } = core::mem::take(self);
        let len = match bits {
            0 => 0,
            _ if bits > 7 || queue >= BASE => 2,
            _ => 1,
        };
        symbols(Digit::split(queue), len)
    }

    /// Bounds on the number of symbols produced by `n` more bytes followed
    /// by [`Self::finish`].
    fn output_bounds(&self, n: usize) -> (usize, Option<usize>) {
        // Every group consumes 13 or 14 bits, so with `t` bits in total there
        // are at least `t / 14` and at most `t / 13` groups.
        let groups = |width: usize| {
            let bits = self.bits as usize;
            (n / width) * 8 + ((n % width) * 8 + bits) / width
        };
        (
            groups(14).saturating_mul(2),
            groups(13).checked_mul(2).and_then(|n| n.checked_add(2)),
        )
    }
}

impl Accumulator for EncodeState {
    type Input = u8;
    type Output = Symbols;

    fn feed(&mut self, byte: u8) -> Symbols {
        self.push(byte)
    }

    fn flush(&mut self) -> Symbols {
        self.finish()
    }

    fn size_hint(
        &self,
        remaining: (usize, Option<usize>),
    ) -> (usize, Option<usize>) {
        let (lower, upper) = remaining;
        (
            self.output_bounds(lower).0,
            upper.and_then(|n| self.output_bounds(n).1),
        )
    }
}

/// Iterator returned by [`encode_to_bytes`].
///
/// Yields the encoded data as ASCII bytes.
pub struct AsciiEncoder<I>(Pump<I, EncodeState>);

impl<I: Iterator<Item = u8>> AsciiEncoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self(Pump::new(iter, EncodeState::new()))
    }
}

impl<I> Iterator for AsciiEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for AsciiEncoder<I> {}

/// Iterator returned by [`encode_to_chars`].
pub struct CharEncoder<I>(AsciiEncoder<I>);

impl<I> Iterator for CharEncoder<I>
where
    I: Iterator<Item = u8>,
{
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(char::from)
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.0.fold(init, |b, c| f(b, char::from(c)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for CharEncoder<I> {}

/// Encodes bytes as basE91, yielding ASCII bytes.
pub fn encode_to_bytes<I>(bytes: I) -> AsciiEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    AsciiEncoder::new(bytes.into_iter())
}

/// Encodes bytes as basE91, yielding chars.
pub fn encode_to_chars<I>(bytes: I) -> CharEncoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    CharEncoder(encode_to_bytes(bytes))
}

/// Encodes bytes as a basE91 [`String`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_string<I>(bytes: I) -> String
where
    I: IntoIterator<Item = u8>,
{
    encode_to_chars(bytes).collect()
}

/// Encodes a byte slice (or `str`) as a basE91 [`String`].
///
/// An empty input produces an empty string.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode<T: AsRef<[u8]>>(data: T) -> String {
    encode_to_string(data.as_ref().iter().copied())
}

/// An upper bound on the encoded length of `n` bytes.
pub const fn max_encoded_len(n: usize) -> usize {
    ((n / 13) * 8 + (n % 13) * 8 / 13).saturating_mul(2).saturating_add(2)
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    pub(crate) fn encode_samples() -> [(&'static [u8], &'static str); 10] {
        [
            (b"", ""),
            (b"\0", "AA"),
            (b"\xff", "/C"),
            (b"a", "GB"),
            (b"ab", "#GD"),
            (&[0; 16], "AAAAAAAAAAAAAAAAAAA"),
            (&[0xff, 0x16, 0xe3, 0x00], "#$|TA"),
            (b"2333", "A2B.M"),
            (b"Hello World!", ">OwJh>Io0Tv!8PE"),
            (b"basE91 is awesome!", "[D7gZoHBt#6tD^9jqrLgsXA"),
        ]
    }

    #[test]
    fn successful_encode() {
        for (i, (plain, codec)) in encode_samples().iter().enumerate() {
            assert_eq!(
                encode(plain),
                *codec,
                "Couldn't encode test case #{} ({})",
                i,
                codec
            );
        }
    }

    #[test]
    fn stepwise_encode() {
        for (plain, codec) in encode_samples().iter() {
            let mut iter = encode_to_bytes(plain.iter().copied());
            let mut out = alloc::vec::Vec::new();
            while let Some(b) = iter.next() {
                out.push(b);
            }
            assert_eq!(out, codec.as_bytes());
            assert_eq!(iter.next(), None);
        }
    }

    #[test]
    fn finish_resets_state() {
        let mut state = EncodeState::new();
        assert_eq!(state.push(b'a').count(), 0);
        let tail: alloc::vec::Vec<u8> = state.finish().collect();
        assert_eq!(tail, b"GB");
        assert_eq!(state.finish().count(), 0);
    }

    #[test]
    fn size_hint_bounds_output() {
        let data: alloc::vec::Vec<u8> = (0..=255).cycle().take(1000).collect();
        for n in [0, 1, 2, 3, 13, 14, 100, 1000] {
            let iter = encode_to_bytes(data[..n].iter().copied());
            let (lower, upper) = iter.size_hint();
            let len = iter.count();
            assert!(lower <= len, "lower {} > {} for n = {}", lower, len, n);
            assert!(len <= upper.unwrap(), "upper < {} for n = {}", len, n);
            assert!(len <= max_encoded_len(n));
        }
    }
}
