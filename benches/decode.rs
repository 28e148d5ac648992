//! Benchmarks for token extraction, provenance decoding and playback ticks.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flate2::write::GzEncoder;
use flate2::Compression;
use lzscope::playback::RecordingRenderer;
use lzscope::{decode, extract_tokens, BitRate, Container, Scheduler};
use std::hint::black_box;
use std::io::Write;
use std::time::{Duration, Instant};

/// Generate random (incompressible) data
fn generate_random_data(size: usize) -> Vec<u8> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut data = Vec::with_capacity(size);
    let mut hasher = DefaultHasher::new();
    for i in 0..size {
        i.hash(&mut hasher);
        data.push((hasher.finish() & 0xFF) as u8);
    }
    data
}

/// Generate prose-like data with frequent repeats
fn generate_text_data(size: usize) -> Vec<u8> {
    let words: [&[u8]; 8] =
        [b"the ", b"quick ", b"brown ", b"fox ", b"jumps ", b"over ", b"lazy ", b"dog\n"];
    let mut data = Vec::with_capacity(size);
    let mut i = 0usize;
    while data.len() < size {
        data.extend_from_slice(words[(i * 5 + i / 7) % words.len()]);
        i += 1;
    }
    data.truncate(size);
    data
}

fn compress_to_gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for size in [16 * 1024, 256 * 1024] {
        let gzip = compress_to_gzip(&generate_text_data(size));
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("text", size), &gzip, |b, gzip| {
            b.iter(|| extract_tokens(gzip.as_slice(), Container::Gzip).unwrap());
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let size = 256 * 1024;

    let patterns = [("text", generate_text_data(size)), ("random", generate_random_data(size))];
    for (name, data) in patterns {
        let gzip = compress_to_gzip(&data);
        let tokens = extract_tokens(gzip.as_slice(), Container::Gzip).unwrap().tokens;

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(name, |b| b.iter(|| decode(black_box(&tokens)).unwrap()));
    }

    group.finish();
}

fn bench_playback(c: &mut Criterion) {
    let gzip = compress_to_gzip(&generate_text_data(64 * 1024));
    let tokens = extract_tokens(gzip.as_slice(), Container::Gzip).unwrap().tokens;
    let decoding = decode(&tokens).unwrap();
    let rate = BitRate::new(1_000_000.0).unwrap();

    c.bench_function("playback_full_run", |b| {
        b.iter(|| {
            let mut scheduler = Scheduler::new(&decoding, RecordingRenderer::new(), rate);
            let start = Instant::now();
            scheduler.run(start);
            let mut now = start;
            while scheduler.tick(now).wants_next_tick() {
                now += Duration::from_millis(16);
            }
            scheduler.revealed_count()
        });
    });
}

criterion_group!(benches, bench_extract, bench_decode, bench_playback);
criterion_main!(benches);
