//! Real-time frame driver for the scheduler.
//!
//! Ticks arrive on a `crossbeam` ticker channel; a second channel carries
//! stop requests. All scheduler calls happen on the caller's thread.

use std::time::{Duration, Instant};

use crossbeam::channel::{never, select, tick, Receiver};
use tracing::debug;

use super::render::Renderer;
use super::scheduler::{Scheduler, TickOutcome};

/// How a driven run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveOutcome {
    /// Every character was revealed
    Completed,
    /// A stop request arrived first
    Cancelled,
    /// The scheduler was stopped from elsewhere
    Halted,
}

/// Calls [`Scheduler::tick`] once per frame until playback ends
#[derive(Clone, Debug)]
pub struct FrameDriver {
    frame_interval: Duration,
}

impl FrameDriver {
    pub fn new(frame_interval: Duration) -> Self {
        Self { frame_interval }
    }

    /// Frame interval for a target frame rate, clamped to 1-1000 fps
    pub fn with_fps(fps: u32) -> Self {
        let fps = fps.clamp(1, 1000);
        Self::new(Duration::from_secs(1) / fps)
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Start the scheduler and drive it until it finishes or `stop` fires.
    ///
    /// A disconnected `stop` channel is treated as "never stop".
    pub fn drive<R: Renderer>(
        &self,
        scheduler: &mut Scheduler<'_, R>,
        stop: &Receiver<()>,
    ) -> DriveOutcome {
        let ticker = tick(self.frame_interval);
        let mut stop = stop.clone();
        scheduler.run(Instant::now());

        loop {
            let mut stop_closed = false;
            select! {
                recv(ticker) -> msg => {
                    let now = msg.unwrap_or_else(|_| Instant::now());
                    match scheduler.tick(now) {
                        TickOutcome::Scheduled { .. } => {}
                        TickOutcome::Finished { .. } => {
                            debug!(revealed = scheduler.revealed_count(), "frame driver completed");
                            return DriveOutcome::Completed;
                        }
                        TickOutcome::Idle => return DriveOutcome::Halted,
                    }
                }
                recv(stop) -> msg => {
                    if msg.is_ok() {
                        scheduler.stop();
                        debug!(revealed = scheduler.revealed_count(), "frame driver cancelled");
                        return DriveOutcome::Cancelled;
                    }
                    stop_closed = true;
                }
            }
            if stop_closed {
                stop = never();
            }
        }
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(crate::PlaybackConfig::default().frame_interval)
    }
}
