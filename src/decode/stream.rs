/// Append-only buffer of decoded bytes.
///
/// Unlike a 32KB sliding window this keeps the whole history, since every
/// output position must stay addressable for provenance.
#[derive(Debug, Default)]
pub struct OutputStream {
    bytes: Vec<u8>,
}

impl OutputStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { bytes: Vec::with_capacity(capacity) }
    }

    /// Current write position (number of bytes written)
    #[inline]
    pub fn position(&self) -> usize {
        self.bytes.len()
    }

    /// Add a single byte
    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Start index of a back-reference `distance` bytes behind the write position.
    ///
    /// `None` when the reference would start before the stream or at the
    /// write position itself (distance 0).
    pub fn source_start(&self, distance: u16) -> Option<usize> {
        if distance == 0 {
            return None;
        }
        self.position().checked_sub(distance as usize)
    }

    /// Copy `length` bytes starting at `start`, calling `f` with each copied byte.
    ///
    /// Copies one byte at a time in increasing order, so a source range that
    /// overlaps the bytes being written (length > distance) repeats the pattern.
    pub fn copy_from<F: FnMut(u8)>(&mut self, start: usize, length: u16, mut f: F) {
        debug_assert!(start < self.position());

        for i in 0..length as usize {
            let byte = self.bytes[start + i];
            self.bytes.push(byte);
            f(byte);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}
