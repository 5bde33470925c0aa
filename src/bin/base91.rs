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

use std::ffi::OsStr;
use std::fmt::{Debug, Display};
use std::fs::File;
use std::io::{self, stdin, stdout, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::exit;

use base91::io::{DecoderWriter, EncoderWriter};
use base91::text::TextEncoding;
use log::debug;

const USAGE: &str = "\
Usage: base91 [options] [file]

Encodes or decodes basE91 data from [file] and writes the result to standard
output. If [file] is missing or \"-\", the data is read from standard input.

Options:
  -d --decode              Decode data instead of encoding
  -t --text-encoding <enc> Treat the data as UTF-8 text and convert it to
                           <enc> before encoding (or from <enc> after
                           decoding), e.g. latin1 or shift_jis
  -w --wrap <cols>         Wrap encoded lines after <cols> characters
                           (0 disables wrapping) [default: 0]
  -h --help                Show this help message
  -v --version             Show program version

Set RUST_LOG=debug to log progress to standard error.
";

#[macro_use]
mod error_exit {
    use super::{exit, Display};

    macro_rules! error_exit {
        ($($args:tt)*) => {
            crate::error_exit::__run(format_args!($($args)*));
        };
    }

    #[doc(hidden)]
    pub fn __run(args: impl Display) -> ! {
        eprintln!("error: {}", args);
        if cfg!(feature = "cli-panic") {
            panic!("error: {}", args);
        } else {
            exit(1);
        }
    }
}

fn expect<T, E: Debug>(result: Result<T, E>, msg: impl Display) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: {}", msg);
        if cfg!(feature = "cli-panic") {
            panic!("error: {}: {:?}", msg, e);
        } else {
            exit(1);
        }
    })
}

struct ParsedArgs<'a> {
    pub decode: bool,
    pub encoding: Option<TextEncoding>,
    pub wrap: usize,
    pub path: Option<&'a Path>,
}

fn show_usage() -> ! {
    print!("{}", USAGE);
    exit(0);
}

fn show_version() -> ! {
    println!("{}", env!("CARGO_PKG_VERSION"));
    exit(0);
}

macro_rules! args_error {
    ($($args:tt)*) => {
        error_exit!(
            "{}\n{}",
            format_args!($($args)*),
            "See `base91 --help` for usage information.",
        );
    };
}

#[derive(Clone, Copy)]
enum Opt {
    TextEncoding,
    Wrap,
}

impl Opt {
    fn name(self) -> &'static str {
        match self {
            Self::TextEncoding => "--text-encoding",
            Self::Wrap => "--wrap",
        }
    }
}

fn parse_args<'a, Args>(args: Args) -> ParsedArgs<'a>
where
    Args: IntoIterator<Item = &'a OsStr>,
{
    let mut decode = false;
    let mut encoding = None;
    let mut wrap = 0;
    let mut file: Option<&'a OsStr> = None;
    let mut options_done = false;
    let mut needs_value: Option<Opt> = None;

    let mut set_value = |opt: Opt, value: &str| match opt {
        Opt::TextEncoding => {
            encoding = Some(TextEncoding::for_label(value).unwrap_or_else(
                |e| {
                    args_error!("{}", e);
                },
            ));
        }
        Opt::Wrap => {
            wrap = value.parse().unwrap_or_else(|_| {
                args_error!("invalid value for --wrap: {}", value);
            });
        }
    };

    let mut process_arg = |arg: &'a OsStr, astr: &str| {
        if let Some(opt) = needs_value.take() {
            set_value(opt, astr);
            return;
        }
        let long = |s: &str| match s {
            "--text-encoding" => Some(Opt::TextEncoding),
            "--wrap" => Some(Opt::Wrap),
            _ => None,
        };
        match astr {
            _ if options_done => {}
            "-" => {}
            "--" => {
                options_done = true;
                return;
            }
            "--help" => show_usage(),
            "--version" => show_version(),
            "--decode" => {
                decode = true;
                return;
            }
            s if s.starts_with("--") => {
                let (name, value) = match s.find('=') {
                    Some(i) => (&s[..i], Some(&s[i + 1..])),
                    None => (s, None),
                };
                match (long(name), value) {
                    (Some(opt), Some(value)) => set_value(opt, value),
                    (Some(opt), None) => needs_value = Some(opt),
                    (None, _) => {
                        args_error!("unrecognized option: {}", name);
                    }
                }
                return;
            }
            s if s.starts_with('-') => {
                for (i, c) in s.char_indices().skip(1) {
                    let opt = match c {
                        'h' => show_usage(),
                        'v' => show_version(),
                        'd' => {
                            decode = true;
                            continue;
                        }
                        't' => Opt::TextEncoding,
                        'w' => Opt::Wrap,
                        c => {
                            args_error!("unrecognized option: -{}", c);
                        }
                    };
                    let rest = &s[i + c.len_utf8()..];
                    if rest.is_empty() {
                        needs_value = Some(opt);
                    } else {
                        set_value(opt, rest);
                    }
                    break;
                }
                return;
            }
            _ => {}
        }
        if file.replace(arg).is_some() {
            args_error!("unexpected argument: {}", astr);
        }
    };

    args.into_iter()
        .map(|a| (a, a.to_string_lossy()))
        .for_each(|(arg, astr)| process_arg(arg, &*astr));

    if let Some(opt) = needs_value {
        args_error!("missing value for {}", opt.name());
    }

    ParsedArgs {
        decode,
        encoding,
        wrap,
        // "-" names standard input.
        path: file.filter(|&f| f != "-").map(Path::new),
    }
}

/// Inserts a line break after every `cols` bytes written.
struct LineWrap<W> {
    inner: W,
    cols: usize,
    col: usize,
}

impl<W: Write> LineWrap<W> {
    fn new(inner: W, cols: usize) -> Self {
        Self {
            inner,
            cols,
            col: 0,
        }
    }

    /// Ends the last line, if it isn't empty.
    fn finish(mut self) -> io::Result<W> {
        if self.col > 0 {
            self.inner.write_all(b"\n")?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for LineWrap<W> {
    fn write(&mut self, mut data: &[u8]) -> io::Result<usize> {
        let len = data.len();
        if self.cols == 0 {
            self.inner.write_all(data)?;
            return Ok(len);
        }
        while !data.is_empty() {
            let n = data.len().min(self.cols - self.col);
            self.inner.write_all(&data[..n])?;
            data = &data[n..];
            self.col += n;
            if self.col == self.cols {
                self.inner.write_all(b"\n")?;
                self.col = 0;
            }
        }
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn read_text(stream: &mut impl Read) -> String {
    let mut text = String::new();
    expect(
        BufReader::new(stream).read_to_string(&mut text),
        "could not read input as UTF-8 text",
    );
    text
}

fn encode(stream: &mut impl Read, args: &ParsedArgs<'_>) {
    let out = LineWrap::new(BufWriter::new(stdout()), args.wrap);
    let mut writer = EncoderWriter::new(out);
    let copied = if let Some(encoding) = args.encoding {
        let text = read_text(stream);
        let bytes = encoding.encode(&text);
        debug!("converted text to {} ({} bytes)", encoding.name(), bytes.len());
        expect(writer.write_all(&bytes), "could not write to standard output");
        bytes.len() as u64
    } else {
        let mut reader = BufReader::new(stream);
        expect(io::copy(&mut reader, &mut writer), "could not encode input")
    };
    let out = expect(writer.finish(), "could not write to standard output");
    expect(out.finish(), "could not write to standard output");
    debug!("encoded {} bytes", copied);
}

fn decode(stream: &mut impl Read, args: &ParsedArgs<'_>) {
    let mut reader = BufReader::new(stream);
    if let Some(encoding) = args.encoding {
        let mut writer = DecoderWriter::new(Vec::new());
        expect(io::copy(&mut reader, &mut writer), "could not read input");
        let bytes = expect(writer.finish(), "could not decode input");
        debug!("decoded {} bytes as {}", bytes.len(), encoding.name());
        let text = encoding.decode(&bytes);
        let mut out = stdout();
        expect(
            out.write_all(text.as_bytes()).and_then(|_| out.flush()),
            "could not write to standard output",
        );
    } else {
        let mut writer = DecoderWriter::new(BufWriter::new(stdout()));
        let copied = expect(
            io::copy(&mut reader, &mut writer),
            "could not decode input",
        );
        expect(writer.finish(), "could not write to standard output");
        debug!("decoded {} input bytes", copied);
    }
}

fn main() {
    pretty_env_logger::init();
    let args: Vec<_> = std::env::args_os().skip(1).collect();
    let parsed = parse_args(args.iter().map(|s| s.as_os_str()));

    let run = |stream: &mut dyn Read| {
        if parsed.decode {
            decode(&mut &mut *stream, &parsed);
        } else {
            encode(&mut &mut *stream, &parsed);
        }
    };

    match parsed.path {
        Some(path) => {
            let mut file = File::open(path).unwrap_or_else(|e| {
                error_exit!("could not open file '{}': {}", path.display(), e);
            });
            run(&mut file);
        }
        None => run(&mut stdin()),
    }
}
