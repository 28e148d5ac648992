use std::ops::Range;

use super::display::quantize_bits;
use crate::tokens::Cost;

/// How a character came to be in the output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharKind {
    /// Emitted by a literal token
    Literal,
    /// Copied by a match token
    Match {
        /// Which match (0-based, in stream order) produced this character
        match_index: usize,
        /// Index of the earlier character this one was copied from
        source_index: usize,
    },
}

/// One decoded output byte with its provenance
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    /// Position in the output
    pub index: usize,
    pub kind: CharKind,
    /// The decoded byte value
    pub byte: u8,
    pub display_text: String,
    /// Share of the producing token's bit cost
    pub bit_cost: f64,
    /// Position of the producing token in the input stream
    pub token_index: usize,
    /// Block the producing token came from
    pub block_id: u32,
    /// Matches that later copied this character, ascending
    pub(crate) referenced_by: Vec<usize>,
}

impl Character {
    pub fn is_match(&self) -> bool {
        matches!(self.kind, CharKind::Match { .. })
    }

    pub fn match_index(&self) -> Option<usize> {
        match self.kind {
            CharKind::Match { match_index, .. } => Some(match_index),
            CharKind::Literal => None,
        }
    }

    pub fn source_index(&self) -> Option<usize> {
        match self.kind {
            CharKind::Match { source_index, .. } => Some(source_index),
            CharKind::Literal => None,
        }
    }

    /// Indices of all matches that copied this character
    pub fn referenced_by(&self) -> &[usize] {
        &self.referenced_by
    }

    pub fn is_referenced_by(&self, match_index: usize) -> bool {
        self.referenced_by.binary_search(&match_index).is_ok()
    }

    /// Bit cost bucketed into half-bit steps, `None` above 11 bits
    pub fn quantized_bit_cost(&self) -> Option<u8> {
        quantize_bits(self.bit_cost)
    }

    pub(crate) fn add_reference(&mut self, match_index: usize) {
        // Matches are attributed in order, so the list stays sorted.
        if self.referenced_by.last() != Some(&match_index) {
            self.referenced_by.push(match_index);
        }
    }
}

/// Summary of one match token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub length: u16,
    pub distance: u16,
    pub cost: Cost,
    /// Display text of each produced character
    pub chars: Vec<String>,
    /// Output index of the first produced character
    pub output_start: usize,
    /// Output index of the first source character
    pub source_start: usize,
    /// Position of the token in the input stream
    pub token_index: usize,
}

impl Match {
    /// Output indices written by this match
    pub fn output_range(&self) -> Range<usize> {
        self.output_start..self.output_start + self.length as usize
    }

    /// Output indices this match copied from
    pub fn source_range(&self) -> Range<usize> {
        self.source_start..self.source_start + self.length as usize
    }
}

/// Counters over a finished decode
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeStats {
    pub literals: u64,
    pub matches: u64,
    pub output_bytes: u64,
    pub matched_bytes: u64,
    pub total_bits: u64,
}

impl DecodeStats {
    /// Average compressed bits per output byte
    pub fn bits_per_byte(&self) -> f64 {
        if self.output_bytes == 0 {
            0.0
        } else {
            self.total_bits as f64 / self.output_bytes as f64
        }
    }
}

/// Result of decoding a token stream. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct Decoding {
    pub(crate) bytes: Vec<u8>,
    pub(crate) chars: Vec<Character>,
    pub(crate) matches: Vec<Match>,
}

impl Decoding {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn chars(&self) -> &[Character] {
        &self.chars
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Decoded bytes as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Characters produced by match `match_index`
    pub fn match_members(&self, match_index: usize) -> &[Character] {
        match self.matches.get(match_index) {
            Some(m) => &self.chars[m.output_range()],
            None => &[],
        }
    }

    /// Indices of the characters match `match_index` copied from.
    ///
    /// Exactly the characters whose `referenced_by` contains `match_index`.
    pub fn match_sources(&self, match_index: usize) -> Range<usize> {
        match self.matches.get(match_index) {
            Some(m) => m.source_range(),
            None => 0..0,
        }
    }

    pub fn total_bits(&self) -> f64 {
        self.chars.iter().map(|c| c.bit_cost).sum()
    }

    pub fn stats(&self) -> DecodeStats {
        let matched_bytes = self.chars.iter().filter(|c| c.is_match()).count() as u64;
        let literals = self.chars.len() as u64 - matched_bytes;
        let match_bits: usize = self.matches.iter().map(|m| m.cost.bit_count()).sum();
        let literal_bits: f64 =
            self.chars.iter().filter(|c| !c.is_match()).map(|c| c.bit_cost).sum();

        DecodeStats {
            literals,
            matches: self.matches.len() as u64,
            output_bytes: self.bytes.len() as u64,
            matched_bytes,
            total_bits: match_bits as u64 + literal_bits as u64,
        }
    }
}
