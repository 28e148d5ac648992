pub mod extract;
pub mod parser;
pub mod tables;

pub use extract::{extract_tokens, Container, Extraction};
pub use parser::{BlockType, DeflateBlock, DeflateParser};
