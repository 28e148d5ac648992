use super::display::display_text;
use super::stream::OutputStream;
use crate::error::{Error, Result};
use crate::tokens::Token;

/// A token together with the display text of every character it produced
#[derive(Clone, Debug)]
pub struct ExpandedToken<'a> {
    pub token: &'a Token,
    pub chars: Vec<String>,
}

/// Flat byte reconstruction of a token stream
#[derive(Clone, Debug)]
pub struct Expansion<'a> {
    pub bytes: Vec<u8>,
    pub items: Vec<ExpandedToken<'a>>,
}

/// Replay tokens into a flat byte stream.
///
/// Fails with [`Error::InvalidReference`] when a match reaches before the
/// start of the stream.
pub fn expand(tokens: &[Token]) -> Result<Expansion<'_>> {
    let capacity = tokens.iter().map(Token::uncompressed_size).sum();
    let mut stream = OutputStream::with_capacity(capacity);
    let mut items = Vec::with_capacity(tokens.len());

    for (token_index, token) in tokens.iter().enumerate() {
        let chars = match token {
            Token::Literal { byte, .. } => {
                stream.push_byte(*byte);
                vec![display_text(*byte)]
            }
            Token::Match { length, distance, .. } => {
                let start = stream.source_start(*distance).ok_or(Error::InvalidReference {
                    token_index,
                    distance: *distance,
                    position: stream.position(),
                })?;
                let mut chars = Vec::with_capacity(*length as usize);
                stream.copy_from(start, *length, |byte| chars.push(display_text(byte)));
                chars
            }
        };
        items.push(ExpandedToken { token, chars });
    }

    Ok(Expansion { bytes: stream.into_inner(), items })
}
