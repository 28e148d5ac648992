//! Whole-stream token extraction from gzip or raw DEFLATE input.

use super::parser::DeflateParser;
use crate::error::Result;
use crate::gzip::GzipHeader;
use crate::tokens::Token;
use std::io::{BufReader, Read};
use tracing::{debug, info};

const BUFFER_SIZE: usize = 128 * 1024;

/// Framing around the DEFLATE data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// One or more gzip members
    Gzip,
    /// A bare DEFLATE stream
    Deflate,
}

/// Tokens of a whole input plus what was seen along the way
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub tokens: Vec<Token>,
    /// DEFLATE blocks parsed, across members
    pub blocks: u32,
    /// Gzip members (0 for raw DEFLATE)
    pub members: u32,
    /// Header of the first gzip member
    pub header: Option<GzipHeader>,
    /// Compressed bytes consumed after the first header
    pub input_bytes: u64,
}

impl Extraction {
    pub fn uncompressed_size(&self) -> usize {
        self.tokens.iter().map(Token::uncompressed_size).sum()
    }
}

/// Parse every block of `input` into one token list.
///
/// Block ids keep counting across gzip members, so distances in later
/// members still refer to the concatenated output.
pub fn extract_tokens<R: Read>(input: R, container: Container) -> Result<Extraction> {
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, input);
    let mut extraction = Extraction::default();

    if container == Container::Gzip {
        let header = GzipHeader::parse(&mut reader)?;
        debug!(filename = ?header.filename, "parsed gzip header");
        extraction.header = Some(header);
    }

    let mut parser = DeflateParser::new(&mut reader);
    loop {
        while let Some(block) = parser.parse_block()? {
            extraction.tokens.extend(block.tokens);
        }
        if container == Container::Deflate {
            break;
        }
        extraction.members += 1;
        if !parser.read_trailer_and_check_next()? {
            break;
        }
        debug!(member = extraction.members, "next gzip member");
    }

    extraction.blocks = parser.blocks_parsed();
    extraction.input_bytes = parser.bytes_read();
    info!(
        tokens = extraction.tokens.len(),
        blocks = extraction.blocks,
        members = extraction.members,
        "extracted tokens"
    );
    Ok(extraction)
}
