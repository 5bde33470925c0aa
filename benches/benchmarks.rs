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

#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use base91::{decode, encode, DecodeStream, EncodeStream};

const EXAMPLE_PLAIN: &[u8] = b"Man is distinguished, not only by his reason, but by this singular passion from other animals, which is a lust of the mind, that by a perseverance of delight in the continued and indefatigable generation of knowledge, exceeds the short vehemence of any carnal pleasure.";

fn cycled(len: usize) -> Vec<u8> {
    (0..=u8::MAX).cycle().take(len).collect()
}

pub fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode-empty", |b| b.iter(|| encode(black_box(b""))));

    c.bench_function("encode-example", |b| {
        b.iter(|| encode(black_box(EXAMPLE_PLAIN)))
    });

    let decoded = cycled(1024);
    c.bench_function("encode-1kb", |b| b.iter(|| encode(&decoded[..])));

    let decoded = cycled(1024 * 1024);
    c.bench_function("encode-1mb", |b| b.iter(|| encode(&decoded[..])));

    c.bench_function("encode-1mb-stream", |b| {
        b.iter(|| {
            let mut stream = EncodeStream::new();
            let mut out = String::new();
            for chunk in decoded.chunks(4096) {
                stream.push_into(chunk, &mut out).unwrap();
            }
            stream.finish_into(&mut out).unwrap();
            out
        })
    });
}

pub fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode-empty", |b| b.iter(|| decode(black_box(""))));

    let encoded = encode(EXAMPLE_PLAIN);
    c.bench_function("decode-example", |b| b.iter(|| decode(&encoded)));

    let encoded = encode(cycled(1024));
    c.bench_function("decode-1kb", |b| b.iter(|| decode(&encoded)));

    let encoded = encode(cycled(1024 * 1024));
    c.bench_function("decode-1mb", |b| b.iter(|| decode(&encoded)));

    c.bench_function("decode-1mb-stream", |b| {
        b.iter(|| {
            let mut stream = DecodeStream::new();
            let mut out = Vec::new();
            for chunk in encoded.as_bytes().chunks(4096) {
                stream.push_into(chunk, &mut out).unwrap();
            }
            stream.finish_into(&mut out).unwrap();
            out
        })
    });
}

criterion_group!(group_encode, bench_encode);
criterion_group!(group_decode, bench_decode);
criterion_main!(group_encode, group_decode);
