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

//! [`Write`] adapters that encode or decode everything written to them.
//!
//! Both writers pass each written chunk through a [`crate::stream`] adapter
//! and forward the completed output to the inner writer. Call `finish` once
//! all data has been written to flush the last group and get the inner writer
//! back; if a writer is dropped without being finished, it is finished on a
//! best-effort basis and any error is ignored.
//!
//! ```
//! use std::io::Write;
//! use base91::io::EncoderWriter;
//!
//! let mut writer = EncoderWriter::new(Vec::new());
//! writer.write_all(b"Hello ")?;
//! writer.write_all(b"World!")?;
//! let encoded = writer.finish()?;
//! assert_eq!(encoded, b">OwJh>Io0Tv!8PE");
//! # Ok::<(), std::io::Error>(())
//! ```

use super::stream::{DecodeStream, EncodeStream};
use super::Error;

use std::io::{self, Write};

fn closed() -> io::Error {
    Error::StreamClosed.into()
}

/// Writes `buf[*pos..]` to `inner`, advancing `pos` past everything the
/// inner writer accepted, even if a later write fails.
fn write_pending<W: Write>(
    inner: &mut W,
    buf: &[u8],
    pos: &mut usize,
) -> io::Result<()> {
    while *pos < buf.len() {
        match inner.write(&buf[*pos..]) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => *pos += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Encodes bytes written to it and writes the basE91 text to `W`.
///
/// Output the inner writer did not accept is held and written before any
/// new input is taken, so a [`Write::write`] that fails has consumed nothing.
pub struct EncoderWriter<W: Write> {
    inner: Option<W>,
    stream: EncodeStream,
    buf: String,
    /// Bytes of `buf` already written to `inner`.
    pos: usize,
}

impl<W: Write> EncoderWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            stream: EncodeStream::new(),
            buf: String::new(),
            pos: 0,
        }
    }

    /// The inner writer, or [`None`] once the writer has been finished.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    fn drain(&mut self) -> io::Result<()> {
        let inner = self.inner.as_mut().ok_or_else(closed)?;
        write_pending(inner, self.buf.as_bytes(), &mut self.pos)?;
        self.buf.clear();
        self.pos = 0;
        Ok(())
    }

    /// Writes the remaining encoded data, flushes the inner writer, and
    /// returns it.
    ///
    /// If the inner writer fails, the unwritten data is kept and this method
    /// may be called again. Once it has succeeded, any later write, or a
    /// second call to this method, fails with [`io::ErrorKind::BrokenPipe`].
    pub fn finish(&mut self) -> io::Result<W> {
        self.drain()?;
        if !self.stream.is_closed() {
            self.stream.finish_into(&mut self.buf)?;
        }
        self.drain()?;
        let mut inner = self.inner.take().ok_or_else(closed)?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for EncoderWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.drain()?;
        self.stream.push_into(data, &mut self.buf)?;
        // The input is consumed now; a failure is reported by the next call.
        let _ = self.drain();
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.inner.is_none() {
            return Ok(());
        }
        self.drain()?;
        self.inner.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl<W: Write> Drop for EncoderWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && !std::thread::panicking() {
            let _ = self.finish();
        }
    }
}

/// Decodes basE91 text written to it and writes the bytes to `W`.
///
/// Characters outside the alphabet are skipped, so the written data may
/// contain line breaks or other noise. Unwritten output is held the same way
/// as in [`EncoderWriter`].
pub struct DecoderWriter<W: Write> {
    inner: Option<W>,
    stream: DecodeStream,
    buf: Vec<u8>,
    pos: usize,
}

impl<W: Write> DecoderWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            stream: DecodeStream::new(),
            buf: Vec::new(),
            pos: 0,
        }
    }

    /// The inner writer, or [`None`] once the writer has been finished.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    fn drain(&mut self) -> io::Result<()> {
        let inner = self.inner.as_mut().ok_or_else(closed)?;
        write_pending(inner, &self.buf, &mut self.pos)?;
        self.buf.clear();
        self.pos = 0;
        Ok(())
    }

    /// Writes the final decoded byte (if any), flushes the inner writer, and
    /// returns it.
    ///
    /// Retrying after an inner write error behaves as in
    /// [`EncoderWriter::finish`].
    pub fn finish(&mut self) -> io::Result<W> {
        self.drain()?;
        if !self.stream.is_closed() {
            self.stream.finish_into(&mut self.buf)?;
        }
        self.drain()?;
        let mut inner = self.inner.take().ok_or_else(closed)?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for DecoderWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.drain()?;
        self.stream.push_into(data, &mut self.buf)?;
        let _ = self.drain();
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.inner.is_none() {
            return Ok(());
        }
        self.drain()?;
        self.inner.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl<W: Write> Drop for DecoderWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && !std::thread::panicking() {
            let _ = self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Accepts at most three bytes per write, and fails the next write with
    /// `WouldBlock` whenever `fail` is set.
    #[derive(Default)]
    struct Flaky {
        out: Vec<u8>,
        fail: Cell<bool>,
    }

    impl Write for Flaky {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.fail.take() {
                return Err(io::ErrorKind::WouldBlock.into());
            }
            let n = data.len().min(3);
            self.out.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn encode_in_pieces() {
        let mut writer = EncoderWriter::new(Vec::new());
        for piece in [&b"basE91 "[..], b"is", b"", b" awesome!"] {
            writer.write_all(piece).unwrap();
        }
        let out = writer.finish().unwrap();
        assert_eq!(out, b"[D7gZoHBt#6tD^9jqrLgsXA");
    }

    #[test]
    fn decode_in_pieces() {
        let mut writer = DecoderWriter::new(Vec::new());
        for piece in ["[D7gZo", "HBt#6\n", "tD^9jq", "rLgsXA\n"] {
            writer.write_all(piece.as_bytes()).unwrap();
        }
        let out = writer.finish().unwrap();
        assert_eq!(out, b"basE91 is awesome!");
    }

    #[test]
    fn write_after_finish() {
        let mut writer = EncoderWriter::new(Vec::new());
        writer.finish().unwrap();
        assert!(writer.get_ref().is_none());
        let err = writer.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(writer.finish().unwrap_err().kind(), err.kind());

        let mut writer = DecoderWriter::new(Vec::new());
        writer.finish().unwrap();
        let err = writer.write(b"AA").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn finishes_on_drop() {
        let mut out = Vec::new();
        {
            let mut writer = EncoderWriter::new(&mut out);
            writer.write_all(b"a").unwrap();
        }
        assert_eq!(out, b"GB");
    }

    #[test]
    fn encode_retries_after_inner_error() {
        let mut writer = EncoderWriter::new(Flaky::default());
        writer.get_ref().unwrap().fail.set(true);
        writer.write_all(b"Hello ").unwrap();

        // Output is held back, so this write fails without consuming input.
        writer.get_ref().unwrap().fail.set(true);
        let err = writer.write(b"World!").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        writer.write_all(b"World!").unwrap();

        writer.get_ref().unwrap().fail.set(true);
        assert!(writer.finish().is_err());
        let out = writer.finish().unwrap();
        assert_eq!(out.out, b">OwJh>Io0Tv!8PE");
    }

    #[test]
    fn decode_retries_after_inner_error() {
        let mut writer = DecoderWriter::new(Flaky::default());
        writer.get_ref().unwrap().fail.set(true);
        writer.write_all(b">OwJh>Io").unwrap();

        writer.get_ref().unwrap().fail.set(true);
        let err = writer.write(b"0Tv!8PE").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        writer.write_all(b"0Tv!8PE").unwrap();
        writer.flush().unwrap();

        let out = writer.finish().unwrap();
        assert_eq!(out.out, b"Hello World!");
    }
}
