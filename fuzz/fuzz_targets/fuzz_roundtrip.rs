#![no_main]

use flate2::write::GzEncoder;
use flate2::Compression;
use libfuzzer_sys::fuzz_target;
use lzscope::{decode, extract_tokens, Container};
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 { &data[..64 * 1024] } else { data };

    let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
    if encoder.write_all(data).is_err() {
        return;
    }
    let gzip_data = match encoder.finish() {
        Ok(d) => d,
        Err(_) => return,
    };

    // Valid gzip must always extract and decode back to the input
    let extraction = extract_tokens(gzip_data.as_slice(), Container::Gzip).unwrap();
    let decoding = decode(&extraction.tokens).unwrap();
    assert_eq!(decoding.bytes(), data, "Round-trip mismatch");

    for ch in decoding.chars() {
        if let Some(source) = ch.source_index() {
            assert!(source < ch.index);
            assert_eq!(decoding.bytes()[source], ch.byte);
        }
    }
});
