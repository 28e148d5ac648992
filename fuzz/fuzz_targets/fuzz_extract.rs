#![no_main]

use libfuzzer_sys::fuzz_target;
use lzscope::{decode, extract_tokens, Container};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as raw DEFLATE: errors are fine, panics are not
    if let Ok(extraction) = extract_tokens(data, Container::Deflate) {
        let _ = decode(&extraction.tokens);
    }
    let _ = extract_tokens(data, Container::Gzip);
});
