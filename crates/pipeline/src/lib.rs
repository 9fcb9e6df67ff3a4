//! The story-to-video generation pipeline.
//!
//! [`Orchestrator`] owns every status transition of stories, shots and
//! assets. It drives three stages, each backed by one external service:
//!
//! 1. **Storyboard** ([`storyboard`]): story text to an ordered list of
//!    shots, committed atomically with the story's title.
//! 2. **Image** ([`image`]): one independent task per shot (fan-out).
//! 3. **Video** ([`video`]): all shots of a story composed into one asset
//!    (fan-in), triggered explicitly by the caller.
//!
//! Trigger operations persist the initial state and return; the remaining
//! work runs as background tasks whose outcome is observable only through
//! the owning row's `status`.

pub mod error;
pub mod image;
pub mod orchestrator;
pub mod storyboard;
pub mod video;

pub use error::{PipelineError, PipelineResult};
pub use orchestrator::Orchestrator;
