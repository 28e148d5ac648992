pub mod attribute;
pub mod display;
pub mod expand;
pub mod record;
pub mod stream;

pub use attribute::attribute;
pub use display::{display_text, quantize_bits};
pub use expand::{expand, ExpandedToken, Expansion};
pub use record::{CharKind, Character, DecodeStats, Decoding, Match};
pub use stream::OutputStream;

use tracing::debug;

use crate::error::Result;
use crate::tokens::{source::parse_tokens, RawToken, Token};

/// Decode a token stream into characters with full provenance.
///
/// Errors abort the whole decode; there is no partial result.
pub fn decode(tokens: &[Token]) -> Result<Decoding> {
    let decoding = attribute(expand(tokens)?)?;
    debug!(
        tokens = tokens.len(),
        chars = decoding.len(),
        matches = decoding.matches().len(),
        "decoded token stream"
    );
    Ok(decoding)
}

/// Convert wire-format tokens, then decode
pub fn decode_raw(raw: &[RawToken]) -> Result<Decoding> {
    let tokens = parse_tokens(raw.to_vec())?;
    decode(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tokens::Cost;

    fn lit(byte: u8) -> Token {
        Token::literal(byte, Cost::from_bit_count(8, 0))
    }

    #[test]
    fn test_literal_display_texts() {
        let decoding = decode(&[lit(0x41), lit(0x0a), lit(0x42)]).unwrap();

        let texts: Vec<&str> = decoding.chars().iter().map(|c| c.display_text.as_str()).collect();
        assert_eq!(texts, vec!["A", "\\n", "B"]);
        assert!(decoding.chars().iter().all(|c| c.kind == CharKind::Literal));
        assert!(decoding.matches().is_empty());
    }

    #[test]
    fn test_overlapping_match_provenance() {
        let tokens = vec![lit(0x41), lit(0x42), Token::reference(3, 2, Cost::from_bit_count(12, 0))];
        let decoding = decode(&tokens).unwrap();

        assert_eq!(decoding.bytes(), &[0x41, 0x42, 0x41, 0x42, 0x41]);
        let sources: Vec<_> = decoding.chars()[2..].iter().map(|c| c.source_index()).collect();
        assert_eq!(sources, vec![Some(0), Some(1), Some(2)]);
        assert!(decoding.chars()[2..].iter().all(|c| c.bit_cost == 4.0));
        assert!(decoding.chars()[2..].iter().all(|c| c.match_index() == Some(0)));

        let m = &decoding.matches()[0];
        assert_eq!(m.chars, vec!["A", "B", "A"]);
        assert_eq!(m.output_range(), 2..5);
        assert_eq!(m.source_range(), 0..3);

        // Character 2 was itself produced by the match and then copied by it
        assert!(decoding.chars()[2].is_referenced_by(0));
        assert!(!decoding.chars()[3].is_referenced_by(0));
    }

    #[test]
    fn test_invalid_reference() {
        let tokens = vec![lit(b'A'), Token::reference(1, 5, Cost::from_bit_count(12, 0))];
        assert!(matches!(decode(&tokens), Err(Error::InvalidReference { token_index: 1, .. })));
    }

    #[test]
    fn test_empty_input() {
        let decoding = decode(&[]).unwrap();
        assert!(decoding.is_empty());
        assert!(decoding.bytes().is_empty());
        assert!(decoding.matches().is_empty());
    }

    #[test]
    fn test_decode_raw_unrecognized() {
        let raw = vec![RawToken {
            kind: "Dictionary".to_string(),
            data: Cost::default(),
            value: None,
            length: None,
            distance: None,
        }];
        assert!(matches!(decode_raw(&raw), Err(Error::UnrecognizedToken { token_index: 0, .. })));
    }

    #[test]
    fn test_stats() {
        let tokens = vec![lit(b'a'), lit(b'b'), Token::reference(4, 2, Cost::from_bit_count(10, 3))];
        let decoding = decode(&tokens).unwrap();
        let stats = decoding.stats();

        assert_eq!(stats.literals, 2);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.output_bytes, 6);
        assert_eq!(stats.matched_bytes, 4);
        assert_eq!(stats.total_bits, 26);
        assert_eq!(decoding.total_bits(), 26.0);
        assert_eq!(decoding.text(), "ababab");
        assert_eq!(decoding.chars()[5].block_id, 3);
        assert_eq!(decoding.chars()[5].token_index, 2);
    }
}
