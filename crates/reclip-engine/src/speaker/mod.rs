//! Chunk-wise speaker attribution.
//!
//! Tracks are scored per fixed-width chunk from presence, a motion proxy and
//! center jitter. A hysteresis state machine turns the per-chunk winners into
//! a timeline that does not flicker between faces.

mod attribution;
mod hysteresis;
pub mod motion;

pub use attribution::{chunk_bounds, ChunkRanking, SpeakerAttributor, TrackMeasures};
pub use hysteresis::{AttributionState, Hysteresis};
pub use motion::{BoxAreaVariance, FrameSource, MotionProxy, MouthRegionMotion};
