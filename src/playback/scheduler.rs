//! Bit-rate driven reveal of decoded characters.
//!
//! The scheduler never sleeps or owns a timer. An external driver calls
//! [`Scheduler::tick`] with the current time; each tick converts elapsed
//! time into a bit budget and reveals as many whole characters as the
//! budget pays for. Unspent bits carry over to the next tick.

use std::time::Instant;

use tracing::{debug, trace};

use super::highlight::{ActiveHighlights, HighlightKind};
use super::rate::BitRate;
use super::render::Renderer;
use super::stats::PlaybackStats;
use crate::decode::{CharKind, Character, Decoding};

/// Lifecycle of a playback run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    Stopped,
}

/// What a tick did and whether another one is needed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Playback is not running; nothing happened
    Idle,
    /// Characters remain; schedule the next tick with this carry
    Scheduled { revealed: usize, carry: f64 },
    /// Every character has been revealed
    Finished { revealed: usize },
}

impl TickOutcome {
    pub fn revealed(&self) -> usize {
        match self {
            TickOutcome::Idle => 0,
            TickOutcome::Scheduled { revealed, .. } | TickOutcome::Finished { revealed } => {
                *revealed
            }
        }
    }

    /// Whether the driver should schedule another tick
    pub fn wants_next_tick(&self) -> bool {
        matches!(self, TickOutcome::Scheduled { .. })
    }
}

/// Playback state for one run over a decoded stream
pub struct Scheduler<'a, R: Renderer> {
    decoding: &'a Decoding,
    renderer: R,
    rate: BitRate,
    state: PlaybackState,
    /// Characters revealed so far; the next one to reveal
    revealed: usize,
    /// Bits accumulated but not yet spent on a reveal
    carry: f64,
    last_tick: Option<Instant>,
    stats: PlaybackStats,
    active: ActiveHighlights,
}

impl<'a, R: Renderer> Scheduler<'a, R> {
    pub fn new(decoding: &'a Decoding, renderer: R, rate: BitRate) -> Self {
        Self {
            decoding,
            renderer,
            rate,
            state: PlaybackState::Idle,
            revealed: 0,
            carry: 0.0,
            last_tick: None,
            stats: PlaybackStats::default(),
            active: ActiveHighlights::new(),
        }
    }

    /// Enter `Running`. Time spent idle or stopped before `now` is not credited.
    pub fn run(&mut self, now: Instant) {
        if self.state == PlaybackState::Running {
            return;
        }
        debug!(from = ?self.state, revealed = self.revealed, "playback running");
        self.state = PlaybackState::Running;
        self.last_tick = Some(now);
    }

    /// Halt playback and retract every highlight applied since the last clear
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Running {
            debug!(revealed = self.revealed, "playback stopped");
            self.state = PlaybackState::Stopped;
        }
        self.clear_highlights();
    }

    /// Change the rate without losing the cursor or the carry
    pub fn set_rate(&mut self, rate: BitRate) {
        trace!(%rate, "bit rate changed");
        self.rate = rate;
    }

    /// Advance playback to `now`, revealing every character the accumulated bits pay for
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.state != PlaybackState::Running {
            return TickOutcome::Idle;
        }

        let last = self.last_tick.unwrap_or(now);
        let elapsed = now.saturating_duration_since(last).as_secs_f64();
        self.carry += self.rate.bits_per_second() * elapsed;
        self.last_tick = Some(now);

        let decoding = self.decoding;
        let mut revealed = 0;
        while let Some(ch) = decoding.chars().get(self.revealed) {
            if ch.bit_cost > self.carry {
                break;
            }
            self.carry -= ch.bit_cost;
            self.reveal(ch, now);
            revealed += 1;
        }

        if self.revealed < decoding.len() {
            TickOutcome::Scheduled { revealed, carry: self.carry }
        } else {
            if revealed > 0 {
                debug!(total = self.revealed, "playback reached end of stream");
            }
            TickOutcome::Finished { revealed }
        }
    }

    /// Stop playback and reveal every remaining character without highlights
    pub fn reveal_all(&mut self, now: Instant) -> usize {
        self.stop();

        let decoding = self.decoding;
        let remaining = &decoding.chars()[self.revealed..];
        for ch in remaining {
            self.renderer.reveal(ch.index);
            self.stats.record(ch.bit_cost, now);
        }
        self.revealed = decoding.len();
        remaining.len()
    }

    fn reveal(&mut self, ch: &Character, now: Instant) {
        debug_assert_eq!(ch.index, self.revealed);
        self.clear_highlights();

        self.renderer.reveal(ch.index);
        self.highlight(HighlightKind::CharActive, vec![ch.index]);

        if let CharKind::Match { match_index, source_index } = ch.kind {
            let decoding = self.decoding;
            let sources = decoding.match_sources(match_index);
            let members = decoding.match_members(match_index);
            self.highlight(HighlightKind::MatchSource, sources.collect());
            self.highlight(HighlightKind::SourceChar, vec![source_index]);
            self.highlight(HighlightKind::MatchDest, members.iter().map(|c| c.index).collect());
        }

        self.revealed += 1;
        self.stats.record(ch.bit_cost, now);
    }

    fn highlight(&mut self, kind: HighlightKind, indices: Vec<usize>) {
        self.renderer.apply_highlight(&indices, kind);
        self.active.record(kind, indices);
    }

    fn clear_highlights(&mut self) {
        for entry in self.active.take() {
            self.renderer.clear_highlight(&entry.indices, entry.kind);
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Whether every character has been revealed
    pub fn is_finished(&self) -> bool {
        self.revealed >= self.decoding.len()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn carry_bits(&self) -> f64 {
        self.carry
    }

    pub fn rate(&self) -> BitRate {
        self.rate
    }

    pub fn stats(&self) -> &PlaybackStats {
        &self.stats
    }

    pub fn active_highlights(&self) -> &ActiveHighlights {
        &self.active
    }

    pub fn decoding(&self) -> &'a Decoding {
        self.decoding
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
