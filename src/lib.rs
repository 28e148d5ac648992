pub mod bits;
pub mod decode;
pub mod deflate;
pub mod error;
pub mod gzip;
pub mod huffman;
pub mod playback;
pub mod tokens;

pub use decode::{decode, decode_raw, CharKind, Character, DecodeStats, Decoding, Match};
pub use deflate::{extract_tokens, Container, Extraction};
pub use error::{Error, Result};
pub use playback::{BitRate, FrameDriver, PlaybackStats, Renderer, Scheduler, TickOutcome};
pub use tokens::{Cost, RawToken, Token, TokenKind};

use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Kind of input file holding a token stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// JSON token dump, optionally gzip-compressed
    Tokens,
    /// Gzip file whose DEFLATE stream is parsed into tokens
    Gzip,
    /// Raw DEFLATE stream
    Deflate,
    /// Detect from file extension
    #[default]
    Auto,
}

impl InputFormat {
    /// Detect format from file path extension
    pub fn detect_from_path(path: &Path) -> Self {
        let name =
            path.file_name().and_then(|s| s.to_str()).map(|s| s.to_lowercase()).unwrap_or_default();

        if name.ends_with(".json") || name.ends_with(".json.gz") {
            Self::Tokens
        } else if name.ends_with(".gz") || name.ends_with(".gzip") {
            Self::Gzip
        } else if name.ends_with(".deflate") || name.ends_with(".raw") {
            Self::Deflate
        } else {
            Self::Tokens
        }
    }

    /// Resolve Auto to a concrete format based on path
    pub fn resolve(self, path: Option<&Path>) -> Self {
        match self {
            Self::Auto => path.map(Self::detect_from_path).unwrap_or(Self::Tokens),
            other => other,
        }
    }
}

/// Load a token stream from `path` in the given format
pub fn load<P: AsRef<Path>>(path: P, format: InputFormat) -> Result<Vec<Token>> {
    let path = path.as_ref();
    match format.resolve(Some(path)) {
        InputFormat::Gzip => Ok(extract_tokens(File::open(path)?, Container::Gzip)?.tokens),
        InputFormat::Deflate => Ok(extract_tokens(File::open(path)?, Container::Deflate)?.tokens),
        InputFormat::Tokens | InputFormat::Auto => tokens::load_tokens(path),
    }
}

/// Configuration for playback
#[derive(Clone, Debug)]
pub struct PlaybackConfig {
    /// Compressed bits revealed per second (default: 64)
    pub bits_per_second: BitRate,
    /// Time between scheduler ticks when driven in real time (default: 16 ms)
    pub frame_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { bits_per_second: BitRate::default(), frame_interval: Duration::from_millis(16) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_from_path() {
        let cases = [
            ("tokens.json", InputFormat::Tokens),
            ("TOKENS.JSON.GZ", InputFormat::Tokens),
            ("archive.tar.gz", InputFormat::Gzip),
            ("stream.deflate", InputFormat::Deflate),
            ("no_extension", InputFormat::Tokens),
        ];
        for (name, expected) in cases {
            assert_eq!(InputFormat::detect_from_path(&PathBuf::from(name)), expected, "{name}");
        }
    }

    #[test]
    fn test_resolve() {
        let path = PathBuf::from("in.gz");
        assert_eq!(InputFormat::Auto.resolve(Some(&path)), InputFormat::Gzip);
        assert_eq!(InputFormat::Deflate.resolve(Some(&path)), InputFormat::Deflate);
        assert_eq!(InputFormat::Auto.resolve(None), InputFormat::Tokens);
    }

    #[test]
    fn test_playback_config_default() {
        let config = PlaybackConfig::default();
        assert_eq!(config.bits_per_second.bits_per_second(), 64.0);
        assert_eq!(config.frame_interval, Duration::from_millis(16));
    }
}
