pub mod source;
pub mod token;

pub use source::{load_tokens, read_tokens, write_tokens};
pub use token::{Cost, RawToken, Token, TokenKind};
