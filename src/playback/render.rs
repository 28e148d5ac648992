//! Rendering collaborators driven by the scheduler.
//!
//! The core only pushes events; it never reads presentation state back.

use std::io::{self, Write};

use super::highlight::HighlightKind;
use crate::decode::{Character, Decoding};

/// Receiver of playback side effects
pub trait Renderer {
    /// Create the (hidden) element for a character before playback starts
    fn materialize(&mut self, ch: &Character);

    /// Make character `index` visible
    fn reveal(&mut self, index: usize);

    fn apply_highlight(&mut self, indices: &[usize], kind: HighlightKind);

    fn clear_highlight(&mut self, indices: &[usize], kind: HighlightKind);
}

/// Materialize every character in index order
pub fn materialize<R: Renderer + ?Sized>(decoding: &Decoding, renderer: &mut R) {
    for ch in decoding.chars() {
        renderer.materialize(ch);
    }
}

/// A renderer call, as captured by [`RecordingRenderer`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    Materialize(usize),
    Reveal(usize),
    Apply(HighlightKind, Vec<usize>),
    Clear(HighlightKind, Vec<usize>),
}

/// Renderer that keeps every call in order
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Indices passed to `reveal`, in call order
    pub fn revealed(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Reveal(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn materialize(&mut self, ch: &Character) {
        self.events.push(RenderEvent::Materialize(ch.index));
    }

    fn reveal(&mut self, index: usize) {
        self.events.push(RenderEvent::Reveal(index));
    }

    fn apply_highlight(&mut self, indices: &[usize], kind: HighlightKind) {
        self.events.push(RenderEvent::Apply(kind, indices.to_vec()));
    }

    fn clear_highlight(&mut self, indices: &[usize], kind: HighlightKind) {
        self.events.push(RenderEvent::Clear(kind, indices.to_vec()));
    }
}

/// Streams revealed characters to a writer, ignoring highlights.
///
/// Writes raw bytes by default, or display text when `escaped` is set.
/// The first write error is kept and stops further output.
pub struct TextRenderer<W: Write> {
    writer: W,
    escaped: bool,
    bytes: Vec<u8>,
    texts: Vec<String>,
    error: Option<io::Error>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W, escaped: bool) -> Self {
        Self { writer, escaped, bytes: Vec::new(), texts: Vec::new(), error: None }
    }

    /// Flush and return the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_index(&mut self, index: usize) -> io::Result<()> {
        if self.escaped {
            if let Some(text) = self.texts.get(index) {
                self.writer.write_all(text.as_bytes())?;
            }
        } else if let Some(&byte) = self.bytes.get(index) {
            self.writer.write_all(&[byte])?;
        }
        self.writer.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn materialize(&mut self, ch: &Character) {
        debug_assert_eq!(ch.index, self.bytes.len());
        self.bytes.push(ch.byte);
        self.texts.push(ch.display_text.clone());
    }

    fn reveal(&mut self, index: usize) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_index(index) {
            self.error = Some(e);
        }
    }

    fn apply_highlight(&mut self, _indices: &[usize], _kind: HighlightKind) {}

    fn clear_highlight(&mut self, _indices: &[usize], _kind: HighlightKind) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::tokens::{Cost, Token};

    fn sample() -> Decoding {
        let cost = || Cost::from_bit_count(8, 0);
        decode(&[Token::literal(b'h', cost()), Token::literal(b'\n', cost())]).unwrap()
    }

    #[test]
    fn test_materialize_in_order() {
        let decoding = sample();
        let mut renderer = RecordingRenderer::new();
        materialize(&decoding, &mut renderer);

        assert_eq!(
            renderer.events(),
            &[RenderEvent::Materialize(0), RenderEvent::Materialize(1)]
        );
    }

    #[test]
    fn test_text_renderer_raw_and_escaped() {
        let decoding = sample();

        let mut raw = TextRenderer::new(Vec::new(), false);
        materialize(&decoding, &mut raw);
        raw.reveal(0);
        raw.reveal(1);
        assert_eq!(raw.finish().unwrap(), b"h\n");

        let mut escaped = TextRenderer::new(Vec::new(), true);
        materialize(&decoding, &mut escaped);
        escaped.reveal(0);
        escaped.reveal(1);
        assert_eq!(escaped.finish().unwrap(), b"h\\n");
    }
}
