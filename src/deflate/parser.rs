use super::tables::{distance_code, length_code, CODE_LENGTH_ORDER};
use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::huffman::HuffmanDecoder;
use crate::tokens::{Cost, Token};
use std::io::Read;
use tracing::trace;

/// DEFLATE block encoding (BTYPE)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    Stored,
    Fixed,
    Dynamic,
}

impl BlockType {
    fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            0 => Ok(Self::Stored),
            1 => Ok(Self::Fixed),
            2 => Ok(Self::Dynamic),
            other => Err(Error::InvalidBlockType(other)),
        }
    }
}

/// One DEFLATE block's tokens, end-of-block marker excluded
#[derive(Clone, Debug)]
pub struct DeflateBlock {
    pub tokens: Vec<Token>,
    pub is_final: bool,
    pub block_type: BlockType,
    /// Position of this block in the whole input, counted across gzip members
    pub block_id: u32,
    /// Bits spent on the block header and code tables
    pub header_bits: usize,
    /// Bits spent on the end-of-block code
    pub end_bits: usize,
}

impl DeflateBlock {
    pub fn uncompressed_size(&self) -> usize {
        self.tokens.iter().map(Token::uncompressed_size).sum()
    }

    /// Total bits of the block, including header and end-of-block code
    pub fn total_bits(&self) -> usize {
        let token_bits: usize = self.tokens.iter().map(|t| t.cost().bit_count()).sum();
        self.header_bits + token_bits + self.end_bits
    }
}

/// Parses DEFLATE blocks into cost-annotated tokens
///
/// Every token carries the exact bits it consumed: the literal/length code,
/// the length extra bits, the distance code and the distance extra bits.
pub struct DeflateParser<R: Read> {
    bits: BitReader<R>,
    /// Whether we've seen the final block of the current member
    finished: bool,
    next_block_id: u32,
}

impl<R: Read> DeflateParser<R> {
    pub fn new(reader: R) -> Self {
        Self { bits: BitReader::new(reader), finished: false, next_block_id: 0 }
    }

    /// Parse the next DEFLATE block.
    /// Returns None once the final block of the current member was parsed.
    pub fn parse_block(&mut self) -> Result<Option<DeflateBlock>> {
        if self.finished {
            return Ok(None);
        }

        self.bits.begin_capture();
        let is_final = self.bits.read_bit()?;
        let block_type = BlockType::from_bits(self.bits.read_bits(2)? as u8)?;
        let block_id = self.next_block_id;

        let mut block = DeflateBlock {
            tokens: Vec::new(),
            is_final,
            block_type,
            block_id,
            header_bits: 0,
            end_bits: 0,
        };

        match block_type {
            BlockType::Stored => self.parse_stored_block(&mut block)?,
            BlockType::Fixed => {
                block.header_bits = self.bits.end_capture().len();
                let literal = HuffmanDecoder::fixed_literal_length()?;
                let distance = HuffmanDecoder::fixed_distance()?;
                self.decode_symbols(&mut block, &literal, Some(&distance))?;
            }
            BlockType::Dynamic => {
                let (literal, distance) = self.read_dynamic_tables()?;
                block.header_bits = self.bits.end_capture().len();
                self.decode_symbols(&mut block, &literal, distance.as_ref())?;
            }
        }

        trace!(
            block_id,
            ?block_type,
            tokens = block.tokens.len(),
            bits = block.total_bits(),
            "parsed deflate block"
        );

        self.next_block_id += 1;
        if is_final {
            self.finished = true;
        }
        Ok(Some(block))
    }

    /// Stored block: each byte becomes a literal costing its 8 raw bits
    fn parse_stored_block(&mut self, block: &mut DeflateBlock) -> Result<()> {
        self.bits.align_to_byte();
        let len = self.bits.read_u16_le()?;
        let nlen = self.bits.read_u16_le()?;
        block.header_bits = self.bits.end_capture().len();

        if len != !nlen {
            return Err(Error::StoredBlockLengthMismatch { len, nlen });
        }

        block.tokens.reserve(len as usize);
        for _ in 0..len {
            self.bits.begin_capture();
            let byte = self.bits.read_bits(8)? as u8;
            let cost = Cost::new(self.bits.end_capture(), block.block_id);
            block.tokens.push(Token::literal(byte, cost));
        }
        Ok(())
    }

    /// Read HLIT/HDIST/HCLEN and the code length sequences of a dynamic block
    fn read_dynamic_tables(&mut self) -> Result<(HuffmanDecoder, Option<HuffmanDecoder>)> {
        let hlit = self.bits.read_bits(5)? as usize + 257;
        let hdist = self.bits.read_bits(5)? as usize + 1;
        let hclen = self.bits.read_bits(4)? as usize + 4;

        let mut code_length_lengths = [0u8; 19];
        for &slot in &CODE_LENGTH_ORDER[..hclen] {
            code_length_lengths[slot] = self.bits.read_bits(3)? as u8;
        }
        let code_length_decoder = HuffmanDecoder::from_code_lengths(&code_length_lengths)?;

        let total = hlit + hdist;
        let mut lengths: Vec<u8> = Vec::with_capacity(total);
        while lengths.len() < total {
            match code_length_decoder.decode(&mut self.bits)? {
                sym @ 0..=15 => lengths.push(sym as u8),
                16 => {
                    let prev = *lengths.last().ok_or(Error::HuffmanIncomplete)?;
                    let repeat = self.bits.read_bits(2)? as usize + 3;
                    lengths.resize(lengths.len() + repeat, prev);
                }
                17 => {
                    let repeat = self.bits.read_bits(3)? as usize + 3;
                    lengths.resize(lengths.len() + repeat, 0);
                }
                18 => {
                    let repeat = self.bits.read_bits(7)? as usize + 11;
                    lengths.resize(lengths.len() + repeat, 0);
                }
                sym => return Err(Error::InvalidHuffmanSymbol(sym)),
            }
        }
        if lengths.len() > total {
            return Err(Error::HuffmanIncomplete);
        }

        let (literal_lengths, distance_lengths) = lengths.split_at(hlit);
        let literal = HuffmanDecoder::from_code_lengths(literal_lengths)?;
        // A block with only literals may carry no distance codes
        let distance = if distance_lengths.iter().all(|&l| l == 0) {
            None
        } else {
            Some(HuffmanDecoder::from_code_lengths(distance_lengths)?)
        };
        Ok((literal, distance))
    }

    fn decode_symbols(
        &mut self,
        block: &mut DeflateBlock,
        literal: &HuffmanDecoder,
        distance: Option<&HuffmanDecoder>,
    ) -> Result<()> {
        loop {
            self.bits.begin_capture();
            let sym = literal.decode(&mut self.bits)?;

            let token = match sym {
                0..=255 => {
                    Token::literal(sym as u8, Cost::new(self.bits.end_capture(), block.block_id))
                }
                256 => {
                    block.end_bits = self.bits.end_capture().len();
                    return Ok(());
                }
                _ => {
                    let (base_len, extra_bits) =
                        length_code(sym).ok_or(Error::InvalidLengthCode(sym))?;
                    let length = base_len + self.bits.read_bits(extra_bits)? as u16;

                    let distance = distance.ok_or(Error::InvalidDistanceCode(0))?;
                    let dist_sym = distance.decode(&mut self.bits)?;
                    let (base_dist, dist_extra_bits) =
                        distance_code(dist_sym).ok_or(Error::InvalidDistanceCode(dist_sym))?;
                    let distance = base_dist + self.bits.read_bits(dist_extra_bits)? as u16;

                    let cost = Cost::new(self.bits.end_capture(), block.block_id);
                    Token::reference(length, distance, cost)
                }
            };
            block.tokens.push(token);
        }
    }

    /// Bytes pulled from the underlying reader so far
    pub fn bytes_read(&self) -> u64 {
        self.bits.bytes_read()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of blocks parsed so far, across members
    pub fn blocks_parsed(&self) -> u32 {
        self.next_block_id
    }

    /// Skip the gzip trailer and look for another member.
    ///
    /// Returns Ok(true) when another member's header was consumed and parsing
    /// can resume, Ok(false) at a clean end of input.
    pub fn read_trailer_and_check_next(&mut self) -> Result<bool> {
        if !self.finished {
            return Err(Error::Internal("trailer read before the final block".into()));
        }

        // CRC32 and ISIZE are not validated
        self.bits.align_to_byte();
        let _crc32 = self.bits.read_u32_le()?;
        let _isize = self.bits.read_u32_le()?;

        let b1 = match self.bits.read_bits(8) {
            Ok(b) => b as u16,
            Err(Error::UnexpectedEof) => return Ok(false),
            Err(e) => return Err(e),
        };
        let b2 = match self.bits.read_bits(8) {
            Ok(b) => b as u16,
            Err(Error::UnexpectedEof) => return Ok(false),
            Err(e) => return Err(e),
        };
        let magic = (b2 << 8) | b1;
        if magic != crate::gzip::header::GZIP_MAGIC {
            return Err(Error::InvalidGzipMagic(magic));
        }

        self.skip_member_header()?;
        self.finished = false;
        Ok(true)
    }

    /// Consume the rest of a gzip member header (after the magic bytes)
    fn skip_member_header(&mut self) -> Result<()> {
        use crate::gzip::header::{FCOMMENT, FEXTRA, FHCRC, FNAME};

        let method = self.bits.read_bits(8)? as u8;
        if method != 8 {
            return Err(Error::UnsupportedCompressionMethod(method));
        }
        let flags = self.bits.read_bits(8)? as u8;
        // mtime, xfl, os
        let _mtime = self.bits.read_u32_le()?;
        let _xfl_os = self.bits.read_bits(16)?;

        if flags & FEXTRA != 0 {
            let xlen = self.bits.read_u16_le()?;
            for _ in 0..xlen {
                self.bits.read_bits(8)?;
            }
        }
        for flag in [FNAME, FCOMMENT] {
            if flags & flag != 0 {
                while self.bits.read_bits(8)? != 0 {}
            }
        }
        if flags & FHCRC != 0 {
            let _hcrc = self.bits.read_u16_le()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn deflate(data: &[u8], level: u32) -> Vec<u8> {
        let mut encoder =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::new(level));
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn parse_all(compressed: Vec<u8>) -> Vec<DeflateBlock> {
        let mut parser = DeflateParser::new(Cursor::new(compressed));
        let mut blocks = Vec::new();
        while let Some(block) = parser.parse_block().unwrap() {
            blocks.push(block);
        }
        blocks
    }

    #[test]
    fn test_parse_stored_block() {
        // BFINAL=1, BTYPE=00, LEN=5, NLEN=!5, "Hello"
        let data = vec![0b00000001, 0x05, 0x00, 0xFA, 0xFF, b'H', b'e', b'l', b'l', b'o'];

        let blocks = parse_all(data);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];

        assert!(block.is_final);
        assert_eq!(block.block_type, BlockType::Stored);
        assert_eq!(block.tokens.len(), 5);
        // Alignment padding is skipped, not read
        assert_eq!(block.header_bits, 3 + 32);
        assert_eq!(block.end_bits, 0);

        // 'H' = 0x48, stored LSB first
        let first = block.tokens[0].cost();
        assert_eq!(first.bit_count(), 8);
        assert_eq!(first.bit_string(), "00010010");
        assert!(matches!(block.tokens[4], Token::Literal { byte: b'o', .. }));
    }

    #[test]
    fn test_stored_length_mismatch() {
        let data = vec![0b00000001, 0x05, 0x00, 0x00, 0x00];
        let mut parser = DeflateParser::new(Cursor::new(data));
        assert!(matches!(
            parser.parse_block(),
            Err(Error::StoredBlockLengthMismatch { len: 5, nlen: 0 })
        ));
    }

    #[test]
    fn test_invalid_block_type() {
        // BFINAL=1, BTYPE=11
        let mut parser = DeflateParser::new(Cursor::new(vec![0b00000111]));
        assert!(matches!(parser.parse_block(), Err(Error::InvalidBlockType(3))));
    }

    #[test]
    fn test_fixed_block_costs() {
        // Short input yields a single fixed block
        let blocks = parse_all(deflate(b"abcabcabcabc", 6));
        let block = &blocks[0];
        assert_eq!(block.block_type, BlockType::Fixed);
        assert_eq!(block.header_bits, 3);
        assert_eq!(block.end_bits, 7);

        // Fixed literals below 144 take 8 bits
        assert_eq!(block.tokens[0].cost().bit_count(), 8);
        let reference = block.tokens.iter().find(|t| matches!(t, Token::Match { .. })).unwrap();
        match reference {
            Token::Match { distance, .. } => assert_eq!(*distance, 3),
            Token::Literal { .. } => unreachable!(),
        }
        // 7-bit length code without extra bits, 5-bit distance code
        assert_eq!(reference.cost().bit_count(), 12);
    }

    #[test]
    fn test_token_bits_account_for_whole_stream() {
        let text = b"the quick brown fox jumps over the lazy dog; the quick brown fox again".repeat(20);
        let compressed = deflate(&text, 9);
        let total_bits = compressed.len() * 8;

        let blocks = parse_all(compressed);
        let counted: usize = blocks.iter().map(DeflateBlock::total_bits).sum();
        // Only the final byte's padding is unaccounted for
        assert!(total_bits - counted < 8);

        let size: usize = blocks.iter().map(DeflateBlock::uncompressed_size).sum();
        assert_eq!(size, text.len());
    }

    #[test]
    fn test_block_ids_are_sequential() {
        // xorshift over a four-letter alphabet
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let text: Vec<u8> = (0..300_000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                b'a' + (state & 3) as u8
            })
            .collect();
        let blocks = parse_all(deflate(&text, 6));
        assert!(blocks.len() > 1);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.block_id, i as u32);
            assert!(block.tokens.iter().all(|t| t.cost().block_id == i as u32));
        }
    }
}
