use super::expand::Expansion;
use super::record::{CharKind, Character, Decoding, Match};
use crate::error::{Error, Result};
use crate::tokens::Token;

/// Build per-character records with provenance from an expanded stream.
///
/// Characters live in one arena indexed by output position; a match
/// records itself on its source characters by index.
pub fn attribute(expansion: Expansion<'_>) -> Result<Decoding> {
    let Expansion { bytes, items } = expansion;
    let mut chars: Vec<Character> = Vec::with_capacity(bytes.len());
    let mut matches: Vec<Match> = Vec::new();

    let byte_at = |index: usize| {
        bytes.get(index).copied().ok_or_else(|| {
            Error::Internal(format!("decoded stream has no byte at position {}", index))
        })
    };

    for (token_index, item) in items.into_iter().enumerate() {
        let position = chars.len();

        match item.token {
            Token::Literal { cost, .. } => {
                if item.chars.len() != 1 {
                    return Err(Error::LiteralMismatch { token_index, produced: item.chars.len() });
                }
                let display_text = item.chars.into_iter().next().unwrap_or_default();
                chars.push(Character {
                    index: position,
                    kind: CharKind::Literal,
                    byte: byte_at(position)?,
                    display_text,
                    bit_cost: cost.bit_count() as f64,
                    token_index,
                    block_id: cost.block_id,
                    referenced_by: Vec::new(),
                });
            }
            Token::Match { length, distance, cost } => {
                let match_index = matches.len();
                if *length == 0 || item.chars.len() != *length as usize {
                    return Err(Error::LengthMismatch {
                        match_index,
                        declared: *length,
                        produced: item.chars.len(),
                    });
                }
                let source_start = position
                    .checked_sub(*distance as usize)
                    .filter(|_| *distance > 0)
                    .ok_or(Error::InvalidReference { token_index, distance: *distance, position })?;

                let bit_cost = cost.bit_count() as f64 / *length as f64;
                for (i, display_text) in item.chars.iter().enumerate() {
                    let index = position + i;
                    let source_index = source_start + i;
                    chars.push(Character {
                        index,
                        kind: CharKind::Match { match_index, source_index },
                        byte: byte_at(index)?,
                        display_text: display_text.clone(),
                        bit_cost,
                        token_index,
                        block_id: cost.block_id,
                        referenced_by: Vec::new(),
                    });
                    chars[source_index].add_reference(match_index);
                }

                matches.push(Match {
                    length: *length,
                    distance: *distance,
                    cost: cost.clone(),
                    chars: item.chars,
                    output_start: position,
                    source_start,
                    token_index,
                });
            }
        }
    }

    if chars.len() != bytes.len() {
        return Err(Error::ByteCountMismatch { bytes: bytes.len(), chars: chars.len() });
    }
    Ok(Decoding { bytes, chars, matches })
}
