/// Transient highlight applied while a character is being revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// The character just revealed
    CharActive,
    /// The single character the revealed one was copied from
    SourceChar,
    /// Every character written by the revealed character's match
    MatchDest,
    /// Every character the revealed character's match copied from
    MatchSource,
}

impl HighlightKind {
    /// Stable class name for renderers that style by name
    pub fn class_name(&self) -> &'static str {
        match self {
            HighlightKind::CharActive => "anim-char-active",
            HighlightKind::SourceChar => "anim-src-char-active",
            HighlightKind::MatchDest => "anim-match-dest-active",
            HighlightKind::MatchSource => "anim-match-src-active",
        }
    }
}

/// One applied highlight: a kind over a set of character indices
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub kind: HighlightKind,
    pub indices: Vec<usize>,
}

/// Every highlight applied since the last clear.
///
/// Clearing hands back exactly what was applied, so retraction never
/// touches highlights owned by anyone else.
#[derive(Debug, Default)]
pub struct ActiveHighlights {
    entries: Vec<Highlight>,
}

impl ActiveHighlights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: HighlightKind, indices: Vec<usize>) {
        self.entries.push(Highlight { kind, indices });
    }

    /// Remove and return all recorded highlights, oldest first
    pub fn take(&mut self) -> Vec<Highlight> {
        std::mem::take(&mut self.entries)
    }

    pub fn entries(&self) -> &[Highlight] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
