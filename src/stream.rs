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

//! Push-based encoding and decoding for data that arrives in chunks.
//!
//! [`EncodeStream`] and [`DecodeStream`] carry the encoder or decoder state
//! from one chunk to the next. Each call to `push` returns only the output
//! that is fully determined by the data seen so far; incomplete groups stay
//! buffered until the next chunk or until the stream is ended. The
//! concatenated output is the same however the input is split:
//!
//! ```
//! use base91::EncodeStream;
//!
//! let mut stream = EncodeStream::new();
//! let mut encoded = stream.push("Hello ")?;
//! encoded += &stream.push("World")?;
//! encoded += &stream.end("!")?;
//! assert_eq!(encoded, base91::encode("Hello World!"));
//! assert!(stream.push("more").is_err());
//! # Ok::<(), base91::Error>(())
//! ```

use super::decode::DecodeState;
use super::encode::{max_encoded_len, EncodeState};
use super::{Digit, Error};

use alloc::string::String;
use alloc::vec::Vec;

enum Phase<S> {
    Open(S),
    Closed,
}

impl<S> Phase<S> {
    fn state(&mut self) -> Result<&mut S, Error> {
        match self {
            Self::Open(state) => Ok(state),
            Self::Closed => Err(Error::StreamClosed),
        }
    }

    fn close(&mut self) -> Result<S, Error> {
        match core::mem::replace(self, Self::Closed) {
            Self::Open(state) => Ok(state),
            Self::Closed => Err(Error::StreamClosed),
        }
    }

    fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Incrementally encodes chunks of bytes.
pub struct EncodeStream {
    phase: Phase<EncodeState>,
}

impl EncodeStream {
    /// Creates a new, open stream.
    pub const fn new() -> Self {
        Self {
            phase: Phase::Open(EncodeState::new()),
        }
    }

    /// Encodes `chunk`, appending the completed symbols to `out`.
    pub fn push_into<T>(
        &mut self,
        chunk: T,
        out: &mut String,
    ) -> Result<(), Error>
    where
        T: AsRef<[u8]>,
    {
        let state = self.phase.state()?;
        let chunk = chunk.as_ref();
        let start = out.len();
        out.reserve(max_encoded_len(chunk.len()));
        out.extend(
            chunk.iter().flat_map(|&b| state.push(b)).map(char::from),
        );
        trace!(
            "encode stream: pushed {} bytes, released {} symbols",
            chunk.len(),
            out.len() - start,
        );
        Ok(())
    }

    /// Encodes `chunk` and returns the completed symbols.
    pub fn push<T>(&mut self, chunk: T) -> Result<String, Error>
    where
        T: AsRef<[u8]>,
    {
        let mut out = String::new();
        self.push_into(chunk, &mut out)?;
        Ok(out)
    }

    /// Flushes the remaining bits into `out` and closes the stream.
    pub fn finish_into(&mut self, out: &mut String) -> Result<(), Error> {
        let mut state = self.phase.close()?;
        let start = out.len();
        out.extend(state.finish().map(char::from));
        trace!("encode stream: ended, flushed {} symbols", out.len() - start);
        Ok(())
    }

    /// Flushes the remaining bits and closes the stream.
    pub fn finish(&mut self) -> Result<String, Error> {
        let mut out = String::new();
        self.finish_into(&mut out)?;
        Ok(out)
    }

    /// Encodes a final chunk, then flushes and closes the stream.
    pub fn end<T>(&mut self, chunk: T) -> Result<String, Error>
    where
        T: AsRef<[u8]>,
    {
        let mut out = self.push(chunk)?;
        self.finish_into(&mut out)?;
        Ok(out)
    }

    /// Whether the stream has been ended.
    pub fn is_closed(&self) -> bool {
        self.phase.is_closed()
    }
}

impl Default for EncodeStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Incrementally decodes chunks of basE91 text.
///
/// Chunks may be `str`s or raw bytes. Since only ASCII bytes are part of the
/// alphabet, a chunk boundary may fall anywhere, even inside a multi-byte
/// UTF-8 sequence.
pub struct DecodeStream {
    phase: Phase<DecodeState>,
}

impl DecodeStream {
    /// Creates a new, open stream.
    pub const fn new() -> Self {
        Self {
            phase: Phase::Open(DecodeState::new()),
        }
    }

    /// Decodes `chunk`, appending the completed bytes to `out`.
    pub fn push_into<T>(
        &mut self,
        chunk: T,
        out: &mut Vec<u8>,
    ) -> Result<(), Error>
    where
        T: AsRef<[u8]>,
    {
        let state = self.phase.state()?;
        let chunk = chunk.as_ref();
        let start = out.len();
        out.extend(
            chunk
                .iter()
                .filter_map(|&b| Digit::from_ascii(b))
                .flat_map(|d| state.push(d)),
        );
        trace!(
            "decode stream: pushed {} bytes, released {} bytes",
            chunk.len(),
            out.len() - start,
        );
        Ok(())
    }

    /// Decodes `chunk` and returns the completed bytes.
    pub fn push<T>(&mut self, chunk: T) -> Result<Vec<u8>, Error>
    where
        T: AsRef<[u8]>,
    {
        let mut out = Vec::new();
        self.push_into(chunk, &mut out)?;
        Ok(out)
    }

    /// Flushes a trailing unpaired digit into `out` and closes the stream.
    pub fn finish_into(&mut self, out: &mut Vec<u8>) -> Result<(), Error> {
        let mut state = self.phase.close()?;
        let start = out.len();
        out.extend(state.finish());
        trace!("decode stream: ended, flushed {} bytes", out.len() - start);
        Ok(())
    }

    /// Flushes a trailing unpaired digit and closes the stream.
    pub fn finish(&mut self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.finish_into(&mut out)?;
        Ok(out)
    }

    /// Decodes a final chunk, then flushes and closes the stream.
    pub fn end<T>(&mut self, chunk: T) -> Result<Vec<u8>, Error>
    where
        T: AsRef<[u8]>,
    {
        let mut out = self.push(chunk)?;
        self.finish_into(&mut out)?;
        Ok(out)
    }

    /// Whether the stream has been ended.
    pub fn is_closed(&self) -> bool {
        self.phase.is_closed()
    }
}

impl Default for DecodeStream {
    fn default() -> Self {
        Self::new()
    }
}
