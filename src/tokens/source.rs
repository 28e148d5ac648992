//! Loading token lists from JSON token dumps.
//!
//! A dump is a JSON array of [`RawToken`]s. Dumps may be stored
//! gzip-compressed; compression is detected from the leading magic bytes,
//! not the file name.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use super::token::{RawToken, Token};
use crate::error::Result;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read raw tokens from a JSON array
pub fn read_raw_json<R: Read>(reader: R) -> Result<Vec<RawToken>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Convert raw tokens in stream order, stopping at the first invalid one
pub fn parse_tokens(raw: Vec<RawToken>) -> Result<Vec<Token>> {
    raw.into_iter().enumerate().map(|(i, r)| Token::from_raw(r, i)).collect()
}

/// Read and convert a JSON token dump, transparently inflating gzip input
pub fn read_tokens<R: Read>(reader: R) -> Result<Vec<Token>> {
    let mut reader = BufReader::new(reader);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    let raw = if is_gzip {
        read_raw_json(MultiGzDecoder::new(reader))?
    } else {
        read_raw_json(reader)?
    };
    debug!(tokens = raw.len(), compressed = is_gzip, "read token dump");

    parse_tokens(raw)
}

/// Load a JSON token dump from disk
pub fn load_tokens<P: AsRef<Path>>(path: P) -> Result<Vec<Token>> {
    read_tokens(File::open(path)?)
}

/// Write tokens as a JSON token dump
pub fn write_tokens<W: Write>(tokens: &[Token], writer: W, pretty: bool) -> Result<()> {
    let raw: Vec<RawToken> = tokens.iter().map(RawToken::from).collect();
    if pretty {
        serde_json::to_writer_pretty(writer, &raw)?;
    } else {
        serde_json::to_writer(writer, &raw)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tokens::Cost;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    const DUMP: &str = r#"[
        {"type":"Literal","data":{"bits":[false,true],"block_id":0},"value":65},
        {"type":"Literal","data":{"bits":[true,true],"block_id":0},"value":66},
        {"type":"Match","data":{"bits":[true,false,false,true],"block_id":0},"length":3,"distance":2}
    ]"#;

    #[test]
    fn test_read_plain_json() {
        let tokens = read_tokens(DUMP.as_bytes()).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2], Token::reference(3, 2, Cost::new(vec![true, false, false, true], 0)));
    }

    #[test]
    fn test_read_gzip_json() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(DUMP.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let tokens = read_tokens(compressed.as_slice()).unwrap();
        assert_eq!(tokens, read_tokens(DUMP.as_bytes()).unwrap());
    }

    #[test]
    fn test_write_then_read() {
        let tokens = read_tokens(DUMP.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_tokens(&tokens, &mut out, false).unwrap();
        assert_eq!(read_tokens(out.as_slice()).unwrap(), tokens);
    }

    #[test]
    fn test_unknown_kind_reports_position() {
        let dump = r#"[
            {"type":"Literal","data":{"bits":[],"block_id":0},"value":65},
            {"type":"Stored","data":{"bits":[],"block_id":0}}
        ]"#;
        let result = read_tokens(dump.as_bytes());
        assert!(matches!(result, Err(Error::UnrecognizedToken { token_index: 1, .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = read_tokens(&b"[{"[..]);
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
