#![no_main]

use libfuzzer_sys::fuzz_target;
use lzscope::{decode, Cost, Token};

fuzz_target!(|data: &[u8]| {
    // Three bytes per token: a tag byte, then a literal or a (length, distance) pair
    let tokens: Vec<Token> = data
        .chunks_exact(3)
        .map(|chunk| {
            let cost = Cost::from_bit_count((chunk[0] & 0x0f) as usize, 0);
            if chunk[0] & 0x80 == 0 {
                Token::literal(chunk[1], cost)
            } else {
                Token::reference(chunk[1] as u16 % 32, chunk[2] as u16 % 64, cost)
            }
        })
        .collect();

    if let Ok(decoding) = decode(&tokens) {
        let expected: usize = tokens.iter().map(Token::uncompressed_size).sum();
        assert_eq!(decoding.len(), expected);
    }
});
