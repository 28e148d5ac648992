use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bit-cost descriptor carried by every token.
///
/// `bits` are the bits the token occupied in the compressed stream, in the
/// order they were consumed. Only the count matters for playback timing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub bits: Vec<bool>,
    pub block_id: u32,
}

impl Cost {
    pub fn new(bits: Vec<bool>, block_id: u32) -> Self {
        Self { bits, block_id }
    }

    /// Cost of `count` zero bits, for token lists built by hand
    pub fn from_bit_count(count: usize, block_id: u32) -> Self {
        Self { bits: vec![false; count], block_id }
    }

    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    /// Render the bits as a `0`/`1` string in stream order
    pub fn bit_string(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }
}

/// One instruction of an LZ77 token stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal byte
    Literal { byte: u8, cost: Cost },
    /// A back-reference: copy `length` bytes starting `distance` bytes back
    Match { length: u16, distance: u16, cost: Cost },
}

impl Token {
    pub fn literal(byte: u8, cost: Cost) -> Self {
        Token::Literal { byte, cost }
    }

    pub fn reference(length: u16, distance: u16, cost: Cost) -> Self {
        Token::Match { length, distance, cost }
    }

    pub fn cost(&self) -> &Cost {
        match self {
            Token::Literal { cost, .. } | Token::Match { cost, .. } => cost,
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Literal { .. } => TokenKind::Literal,
            Token::Match { .. } => TokenKind::Match,
        }
    }

    /// Returns the number of output bytes this token produces
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal { .. } => 1,
            Token::Match { length, .. } => *length as usize,
        }
    }

    /// Convert a wire-format token, `token_index` being its position in the stream
    pub fn from_raw(raw: RawToken, token_index: usize) -> Result<Self> {
        let kind = match TokenKind::parse(&raw.kind) {
            Some(kind) => kind,
            None => return Err(Error::UnrecognizedToken { token_index, kind: raw.kind }),
        };
        match kind {
            TokenKind::Literal => {
                let byte = narrow(raw.value, "value", token_index)?;
                Ok(Token::Literal { byte, cost: raw.data })
            }
            TokenKind::Match => {
                let length = narrow(raw.length, "length", token_index)?;
                let distance = narrow(raw.distance, "distance", token_index)?;
                Ok(Token::Match { length, distance, cost: raw.data })
            }
        }
    }
}

/// Require a wire field and fit it into its token type
fn narrow<T>(value: Option<u64>, field: &'static str, token_index: usize) -> Result<T>
where
    T: TryFrom<u64> + Into<u64> + Bounded,
{
    let value = value.ok_or(Error::MissingField { token_index, field })?;
    T::try_from(value).map_err(|_| Error::FieldOutOfRange {
        token_index,
        field,
        value,
        max: T::MAX_VALUE.into(),
    })
}

trait Bounded {
    const MAX_VALUE: Self;
}

impl Bounded for u8 {
    const MAX_VALUE: Self = u8::MAX;
}

impl Bounded for u16 {
    const MAX_VALUE: Self = u16::MAX;
}

/// Discriminant of a [`Token`], as spelled in the wire format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Literal,
    Match,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Literal => "Literal",
            TokenKind::Match => "Match",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Literal" => Some(TokenKind::Literal),
            "Match" => Some(TokenKind::Match),
            _ => None,
        }
    }
}

/// Wire form of a token as found in JSON token dumps.
///
/// ```json
/// {"type": "Match", "data": {"bits": [true, false], "block_id": 0}, "length": 3, "distance": 2}
/// ```
///
/// Kind-specific fields are optional and wider than their token types here;
/// [`Token::from_raw`] enforces presence and range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawToken {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Cost,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u64>,
}

impl From<&Token> for RawToken {
    fn from(token: &Token) -> Self {
        match token {
            Token::Literal { byte, cost } => RawToken {
                kind: TokenKind::Literal.as_str().to_string(),
                data: cost.clone(),
                value: Some(*byte as u64),
                length: None,
                distance: None,
            },
            Token::Match { length, distance, cost } => RawToken {
                kind: TokenKind::Match.as_str().to_string(),
                data: cost.clone(),
                value: None,
                length: Some(*length as u64),
                distance: Some(*distance as u64),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_json() {
        let json = r#"{"type":"Literal","data":{"bits":[true,false,true],"block_id":2},"value":65}"#;
        let raw: RawToken = serde_json::from_str(json).unwrap();
        let token = Token::from_raw(raw, 0).unwrap();

        assert_eq!(token, Token::literal(b'A', Cost::new(vec![true, false, true], 2)));
        assert_eq!(token.cost().bit_count(), 3);
        assert_eq!(token.cost().bit_string(), "101");
    }

    #[test]
    fn test_parse_match_json() {
        let json = r#"{"type":"Match","data":{"bits":[],"block_id":0},"length":3,"distance":2}"#;
        let raw: RawToken = serde_json::from_str(json).unwrap();
        let token = Token::from_raw(raw, 4).unwrap();

        assert_eq!(token.kind(), TokenKind::Match);
        assert_eq!(token.uncompressed_size(), 3);
    }

    #[test]
    fn test_unrecognized_kind() {
        let json = r#"{"type":"EndOfBlock","data":{"bits":[],"block_id":0}}"#;
        let raw: RawToken = serde_json::from_str(json).unwrap();
        let result = Token::from_raw(raw, 7);

        match result {
            Err(Error::UnrecognizedToken { token_index, kind }) => {
                assert_eq!(token_index, 7);
                assert_eq!(kind, "EndOfBlock");
            }
            other => panic!("expected UnrecognizedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_match_field() {
        let json = r#"{"type":"Match","data":{"bits":[],"block_id":0},"length":3}"#;
        let raw: RawToken = serde_json::from_str(json).unwrap();
        let result = Token::from_raw(raw, 1);
        assert!(matches!(result, Err(Error::MissingField { token_index: 1, field: "distance" })));
    }

    #[test]
    fn test_oversized_fields_rejected() {
        let json = r#"{"type":"Match","data":{"bits":[],"block_id":0},"length":70000,"distance":2}"#;
        let raw: RawToken = serde_json::from_str(json).unwrap();
        assert!(matches!(
            Token::from_raw(raw, 3),
            Err(Error::FieldOutOfRange { token_index: 3, field: "length", value: 70000, max: 65535 })
        ));

        let json = r#"{"type":"Literal","data":{"bits":[],"block_id":0},"value":256}"#;
        let raw: RawToken = serde_json::from_str(json).unwrap();
        assert!(matches!(
            Token::from_raw(raw, 0),
            Err(Error::FieldOutOfRange { field: "value", max: 255, .. })
        ));
    }

    #[test]
    fn test_wire_form_omits_unused_fields() {
        let token = Token::literal(b'x', Cost::from_bit_count(2, 0));
        let json = serde_json::to_string(&RawToken::from(&token)).unwrap();

        assert!(json.contains(r#""type":"Literal""#));
        assert!(json.contains(r#""value":120"#));
        assert!(!json.contains("length"));
        assert!(!json.contains("distance"));
    }
}
