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

//! Functions and types for decoding basE91 data.
//!
//! Decoding cannot fail. Any character that isn't part of the alphabet
//! (whitespace, line breaks, quotes, non-ASCII text, ...) is skipped, so
//! `decode(s)` is always equal to `decode` of `s` with those characters
//! removed.

use super::iter::{Accumulator, Pump};
use super::Digit;
use super::{group_width, BASE};

use core::array;
use core::iter::{FilterMap, FusedIterator, Take};
use core::str::Bytes;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Up to two bytes released by the decoder at once.
pub(crate) type Octets = Take<array::IntoIter<u8, 2>>;

/// Bit accumulator for the decoder.
///
/// Digits are paired up; `pending` holds the low digit of an incomplete
/// pair. After each pair is merged, whole bytes are drained from `queue`,
/// leaving at most 7 bits, so `queue` never holds more than 21 bits.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct DecodeState {
    queue: u32,
    bits: u32,
    pending: Option<Digit>,
}

impl DecodeState {
    pub const fn new() -> Self {
        Self {
            queue: 0,
            bits: 0,
            pending: None,
        }
    }

    /// Adds a digit, emitting the whole bytes that become available once
    /// it completes a pair.
    pub fn push(&mut self, digit: Digit) -> Octets {
        let mut out = [0; 2];
        let low = match self.pending.take() {
            Some(low) => low,
            None => {
                self.pending = Some(digit);
                return IntoIterator::into_iter(out).take(0);
            }
        };

        let value = u32::from(low) + u32::from(digit) * BASE;
        self.queue |= value << self.bits;
        self.bits += group_width(value);

        let mut len = 0;
        while self.bits > 7 {
            out[len] = (self.queue & 0xff) as u8;
            self.queue >>= 8;
            self.bits -= 8;
            len += 1;
        }
        IntoIterator::into_iter(out).take(len)
    }

    /// Emits the final byte of an unpaired trailing digit, if any, and
    /// resets the state.
    pub fn finish(&mut self) -> Octets {
        let Self {
            queue,
            bits,
            pending,
        } = core::mem::take(self);
        let last = pending.map(|d| (queue | u32::from(d) << bits) & 0xff);
        IntoIterator::into_iter([last.unwrap_or(0) as u8, 0])
            .take(last.is_some() as usize)
    }

    /// Bounds on the number of bytes produced by `n` more digits followed
    /// by [`Self::finish`].
    fn output_bounds(&self, n: usize) -> (usize, Option<usize>) {
        let bits = self.bits as usize;
        let digits = n.saturating_add(self.pending.is_some() as usize);
        let (pairs, odd) = (digits / 2, digits % 2);
        (
            pairs.saturating_mul(13).saturating_add(bits) / 8 + odd,
            pairs
                .checked_mul(14)
                .and_then(|n| n.checked_add(bits))
                .map(|n| n / 8 + odd),
        )
    }
}

impl Accumulator for DecodeState {
    type Input = Digit;
    type Output = Octets;

    fn feed(&mut self, digit: Digit) -> Octets {
        self.push(digit)
    }

    fn flush(&mut self) -> Octets {
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

type AsciiDigits<I> = FilterMap<I, fn(u8) -> Option<Digit>>;
type CharDigits<I> = FilterMap<I, fn(char) -> Option<Digit>>;

/// Iterator returned by [`decode_bytes`].
pub struct BytesDecoder<I>(Pump<AsciiDigits<I>, DecodeState>);

impl<I: Iterator<Item = u8>> BytesDecoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        let lookup: fn(u8) -> Option<Digit> = Digit::from_ascii;
        let digits: AsciiDigits<I> = iter.filter_map(lookup);
        Self(Pump::new(digits, DecodeState::new()))
    }
}

impl<I> Iterator for BytesDecoder<I>
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

impl<I: Iterator<Item = u8>> FusedIterator for BytesDecoder<I> {}

/// Iterator returned by [`decode_chars`].
pub struct CharDecoder<I>(Pump<CharDigits<I>, DecodeState>);

impl<I: Iterator<Item = char>> CharDecoder<I> {
    pub(crate) fn new(iter: I) -> Self {
        let lookup: fn(char) -> Option<Digit> = Digit::from_char;
        let digits: CharDigits<I> = iter.filter_map(lookup);
        Self(Pump::new(digits, DecodeState::new()))
    }
}

impl<I> Iterator for CharDecoder<I>
where
    I: Iterator<Item = char>,
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

impl<I: Iterator<Item = char>> FusedIterator for CharDecoder<I> {}

/// Iterator returned by [`decode_str`].
// Non-ASCII chars only contain bytes >= 0x80, none of which are in the
// alphabet, so decoding the UTF-8 bytes is the same as decoding the chars.
pub struct StrDecoder<'a>(BytesDecoder<Bytes<'a>>);

impl<'a> Iterator for StrDecoder<'a> {
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

impl<'a> FusedIterator for StrDecoder<'a> {}

/// Decodes basE91 data given as ASCII bytes.
///
/// Bytes outside the alphabet are skipped, so the input doesn't have to be
/// valid UTF-8.
pub fn decode_bytes<I>(bytes: I) -> BytesDecoder<I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    BytesDecoder::new(bytes.into_iter())
}

/// Decodes a sequence of basE91 chars.
pub fn decode_chars<I>(chars: I) -> CharDecoder<I::IntoIter>
where
    I: IntoIterator<Item = char>,
{
    CharDecoder::new(chars.into_iter())
}

/// Decodes a basE91 `str`.
pub fn decode_str(s: &str) -> StrDecoder<'_> {
    StrDecoder(decode_bytes(s.bytes()))
}

/// Takes a decoder and stores the contents in a [`Vec`].
///
/// This is equivalent to calling [`decoder.collect()`](Iterator::collect).
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec<D>(decoder: D) -> Vec<u8>
where
    D: Iterator<Item = u8>,
{
    decoder.collect()
}

/// Decodes a basE91 `str` (or byte slice) into a [`Vec`].
///
/// An empty input, or one without any alphabet characters, produces an
/// empty vector.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode<T: AsRef<[u8]>>(data: T) -> Vec<u8> {
    decode_to_vec(decode_bytes(data.as_ref().iter().copied()))
}
