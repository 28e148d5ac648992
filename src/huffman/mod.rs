pub mod decoder;

pub use decoder::HuffmanDecoder;
