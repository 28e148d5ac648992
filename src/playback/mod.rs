pub mod driver;
pub mod highlight;
pub mod rate;
pub mod render;
pub mod scheduler;
pub mod stats;

pub use driver::{DriveOutcome, FrameDriver};
pub use highlight::{ActiveHighlights, Highlight, HighlightKind};
pub use rate::BitRate;
pub use render::{materialize, RecordingRenderer, RenderEvent, Renderer, TextRenderer};
pub use scheduler::{PlaybackState, Scheduler, TickOutcome};
pub use stats::PlaybackStats;
