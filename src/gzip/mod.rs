pub mod header;

pub use header::GzipHeader;
