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

//! Integration tests for the basE91 codec.
//!
//! These tests check the round trip, alphabet and noise properties over
//! pseudo-random data, and that the streaming adapters produce the same
//! output as the one-shot functions however the input is split.

use base91::alphabet::is_alphabet_char;
use base91::{
    decode, decode_bytes, decode_chars, decode_str, encode, encode_to_bytes,
    encode_to_chars, DecodeStream, EncodeStream, ALPHABET,
};

/// Small deterministic generator so failures are reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }

    fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next() as u8).collect()
    }
}

fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// Test the vectors produced by the reference implementation.
#[test]
fn test_known_vectors() {
    let cases: [(&[u8], &str); 4] = [
        (b"Hello World!", ">OwJh>Io0Tv!8PE"),
        (b"basE91 is awesome!", "[D7gZoHBt#6tD^9jqrLgsXA"),
        (&[0xff, 0x16, 0xe3, 0x00], "#$|TA"),
        (b"", ""),
    ];
    for (plain, codec) in cases.iter() {
        assert_eq!(encode(plain), *codec);
        assert_eq!(decode(codec), *plain);
    }
}

/// Test that `decode(encode(b)) == b` for random data of many lengths.
#[test]
fn test_roundtrip_random() {
    let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
    for _ in 0..200 {
        let len = rng.below(1000);
        let data = rng.bytes(len);
        let encoded = encode(&data);
        assert!(encoded.len() <= base91::max_encoded_len(len));
        assert_eq!(decode(&encoded), data, "length {}", len);
    }
}

/// Test every short input exhaustively for lengths 0 and 1, and a spread of
/// two-byte inputs, where the flush rules matter most.
#[test]
fn test_roundtrip_short() {
    assert_eq!(decode(encode(b"")), b"");
    for a in 0..=u8::MAX {
        assert_eq!(decode(encode([a])), [a]);
        for b in (0..=u8::MAX).step_by(7) {
            assert_eq!(decode(encode([a, b])), [a, b]);
        }
    }
}

/// Test that encoded output only uses alphabet characters.
#[test]
fn test_alphabet_closure() {
    let mut rng = XorShift(42);
    let data = rng.bytes(4096);
    assert!(encode(&data).chars().all(is_alphabet_char));
    assert!(encode_to_bytes(data).all(|b| ALPHABET.contains(&b)));
}

/// Test that the iterator forms agree with the one-shot functions.
#[test]
fn test_iterators_agree() {
    let mut rng = XorShift(7);
    let data = rng.bytes(333);
    let encoded = encode(&data);
    assert_eq!(encode_to_chars(data.clone()).collect::<String>(), encoded);
    assert_eq!(decode_chars(encoded.chars()).collect::<Vec<_>>(), data);
    assert_eq!(decode_str(&encoded).collect::<Vec<_>>(), data);
    assert_eq!(decode_bytes(encoded.bytes()).collect::<Vec<_>>(), data);
}

/// Test that characters outside the alphabet are ignored.
#[test]
fn test_noise_tolerance() {
    let noisy = "qXz'I;W/Hl 虚空 \"TD\" dl(2VK,^]@qU2u   9Mbps5_1rg''-----'BB";
    let stripped: String =
        noisy.chars().filter(|&c| is_alphabet_char(c)).collect();
    assert_eq!(stripped, "qXzI;W/Hl\"TD\"dl(2VK,^]@qU2u9Mbps5_1rgBB");
    assert_eq!(decode(noisy), decode(&stripped));
    assert_eq!(decode("   "), decode(""));
    assert!(decode("   ").is_empty());

    let mut rng = XorShift(1234);
    let data = rng.bytes(500);
    let encoded = encode(&data);
    let mut noisy = String::new();
    for c in encoded.chars() {
        noisy.push(c);
        match rng.below(6) {
            0 => noisy.push('\n'),
            1 => noisy.push_str("\r\n"),
            2 => noisy.push(' '),
            3 => noisy.push('é'),
            _ => {}
        }
    }
    assert_eq!(decode(&noisy), data);
}

/// Test that splitting the input into random chunks doesn't change the
/// output of either stream adapter.
#[test]
fn test_chunking_invariance() {
    init_logger();
    let mut rng = XorShift(0xdead_beef);
    for _ in 0..100 {
        let len = rng.below(300);
        let data = rng.bytes(len);
        let expected = encode(&data);

        let mut stream = EncodeStream::new();
        let mut encoded = String::new();
        let mut rest = &data[..];
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_at(rng.below(rest.len()) + 1);
            encoded += &stream.push(chunk).unwrap();
            rest = tail;
        }
        encoded += &stream.finish().unwrap();
        assert_eq!(encoded, expected);

        let mut stream = DecodeStream::new();
        let mut decoded = Vec::new();
        let mut rest = expected.as_bytes();
        while rest.len() > 1 {
            let (chunk, tail) = rest.split_at(rng.below(rest.len() - 1) + 1);
            decoded.extend(stream.push(chunk).unwrap());
            rest = tail;
        }
        decoded.extend(stream.end(rest).unwrap());
        assert_eq!(decoded, data);
    }
}
