use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed token JSON: {0}")]
    Json(#[from] serde_json::Error),

    // Token stream errors
    #[error(
        "Token {token_index}: back-reference distance {distance} reaches before stream start (position {position})"
    )]
    InvalidReference { token_index: usize, distance: u16, position: usize },

    #[error("Match {match_index}: declared length {declared} but produced {produced} characters")]
    LengthMismatch { match_index: usize, declared: u16, produced: usize },

    #[error("Token {token_index}: unrecognized token kind {kind:?}")]
    UnrecognizedToken { token_index: usize, kind: String },

    #[error("Token {token_index}: missing field `{field}`")]
    MissingField { token_index: usize, field: &'static str },

    #[error("Token {token_index}: field `{field}` value {value} exceeds {max}")]
    FieldOutOfRange { token_index: usize, field: &'static str, value: u64, max: u64 },

    #[error("Literal token {token_index} expanded to {produced} characters, expected 1")]
    LiteralMismatch { token_index: usize, produced: usize },

    #[error("Expanded stream has {bytes} bytes but {chars} characters")]
    ByteCountMismatch { bytes: usize, chars: usize },

    // Playback errors
    #[error("Invalid bit rate: {0} (must be a positive number)")]
    InvalidBitRate(f64),

    // Gzip header errors
    #[error("Invalid gzip magic bytes: expected 0x1f8b, got 0x{0:04x}")]
    InvalidGzipMagic(u16),

    #[error("Unsupported compression method: {0} (only DEFLATE/8 supported)")]
    UnsupportedCompressionMethod(u8),

    // DEFLATE parsing errors
    #[error("Invalid DEFLATE block type: {0}")]
    InvalidBlockType(u8),

    #[error("Invalid Huffman code length: {0} (max 15)")]
    InvalidCodeLength(u8),

    #[error("Huffman code incomplete: not all codes assigned")]
    HuffmanIncomplete,

    #[error("Invalid Huffman symbol: {0}")]
    InvalidHuffmanSymbol(u16),

    #[error("Invalid length code: {0}")]
    InvalidLengthCode(u16),

    #[error("Invalid distance code: {0}")]
    InvalidDistanceCode(u16),

    #[error("Stored block length mismatch: LEN={len}, NLEN={nlen}")]
    StoredBlockLengthMismatch { len: u16, nlen: u16 },

    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
