//! RFC 1951 constant tables.

/// (base length, extra bits) for length symbols 257-285
pub const LENGTH_TABLE: [(u16, u8); 29] = [
    (3, 0), (4, 0), (5, 0), (6, 0), (7, 0), (8, 0), (9, 0), (10, 0),
    (11, 1), (13, 1), (15, 1), (17, 1),
    (19, 2), (23, 2), (27, 2), (31, 2),
    (35, 3), (43, 3), (51, 3), (59, 3),
    (67, 4), (83, 4), (99, 4), (115, 4),
    (131, 5), (163, 5), (195, 5), (227, 5),
    (258, 0),
];

/// (base distance, extra bits) for distance symbols 0-29
pub const DISTANCE_TABLE: [(u16, u8); 30] = [
    (1, 0), (2, 0), (3, 0), (4, 0),
    (5, 1), (7, 1), (9, 2), (13, 2),
    (17, 3), (25, 3), (33, 4), (49, 4),
    (65, 5), (97, 5), (129, 6), (193, 6),
    (257, 7), (385, 7), (513, 8), (769, 8),
    (1025, 9), (1537, 9), (2049, 10), (3073, 10),
    (4097, 11), (6145, 11), (8193, 12), (12289, 12),
    (16385, 13), (24577, 13),
];

/// Order in which code length code lengths are stored in a dynamic block header
pub const CODE_LENGTH_ORDER: [usize; 19] =
    [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Base length and extra bit count for a length symbol
pub fn length_code(symbol: u16) -> Option<(u16, u8)> {
    symbol.checked_sub(257).and_then(|i| LENGTH_TABLE.get(i as usize)).copied()
}

/// Base distance and extra bit count for a distance symbol
pub fn distance_code(symbol: u16) -> Option<(u16, u8)> {
    DISTANCE_TABLE.get(symbol as usize).copied()
}

/// Fixed literal/length code lengths: 8, 9, 7 and 8 bits by symbol range
pub fn fixed_literal_lengths() -> [u8; 288] {
    let mut lengths = [8u8; 288];
    lengths[144..=255].fill(9);
    lengths[256..=279].fill(7);
    lengths
}

/// Fixed distance code lengths (all 5 bits)
pub fn fixed_distance_lengths() -> [u8; 32] {
    [5u8; 32]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_code() {
        assert_eq!(length_code(257), Some((3, 0)));
        assert_eq!(length_code(265), Some((11, 1)));
        assert_eq!(length_code(285), Some((258, 0)));
        assert_eq!(length_code(256), None);
        assert_eq!(length_code(286), None);
    }

    #[test]
    fn test_distance_code() {
        assert_eq!(distance_code(0), Some((1, 0)));
        assert_eq!(distance_code(4), Some((5, 1)));
        assert_eq!(distance_code(29), Some((24577, 13)));
        assert_eq!(distance_code(30), None);
    }

    #[test]
    fn test_largest_values_fit() {
        let (base, extra) = distance_code(29).unwrap();
        assert_eq!(base as u32 + (1 << extra) - 1, 32768);
        let (base, extra) = length_code(284).unwrap();
        assert_eq!(base + (1 << extra) - 1, 258);
    }

    #[test]
    fn test_fixed_lengths() {
        let lengths = fixed_literal_lengths();
        assert_eq!(lengths[0], 8);
        assert_eq!(lengths[143], 8);
        assert_eq!(lengths[144], 9);
        assert_eq!(lengths[256], 7);
        assert_eq!(lengths[280], 8);
    }
}
