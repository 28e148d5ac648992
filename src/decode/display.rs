const NEWLINE: u8 = 0x0a;

/// Human-readable rendering of a decoded byte.
///
/// Printable ASCII maps to itself, newline to the two-character escape `\n`,
/// everything else to a `0x`-prefixed, zero-padded lowercase hex pair.
pub fn display_text(byte: u8) -> String {
    match byte {
        0x20..=0x7e => (byte as char).to_string(),
        NEWLINE => "\\n".to_string(),
        _ => format!("0x{:02x}", byte),
    }
}

/// Bucket a per-character bit cost into half-bit steps (0-22).
///
/// Costs above 11 bits have no bucket.
pub fn quantize_bits(bits: f64) -> Option<u8> {
    if !(0.0..=11.0).contains(&bits) {
        return None;
    }
    Some((bits * 2.0).round() as u8)
}
