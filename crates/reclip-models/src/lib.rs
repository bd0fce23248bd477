//! Shared data models for the reclip reframing pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Face frames, bounding boxes and tracks
//! - Speech windows and the speaker timeline
//! - Transcripts, clip candidates and scored candidates
//! - Crop keyframes and the per-platform export plan

pub mod candidate;
pub mod crop;
pub mod face;
pub mod geometry;
pub mod plan;
pub mod platform;
pub mod speaker;
pub mod speech;
pub mod span;
pub mod track;
pub mod transcript;

// Re-export common types
pub use candidate::{Candidate, CandidateFeatures, ScoredCandidate};
pub use crop::{CropKeyframe, CropPath};
pub use face::{FaceFrame, ScoredBox};
pub use geometry::BoundingBox;
pub use plan::{ExportPlan, PlannedClip};
pub use platform::{ParsePlatformError, Platform, PlatformMap};
pub use speaker::{SpeakerChunk, SpeakerTimeline};
pub use speech::SpeechWindow;
pub use span::TimeSpan;
pub use track::{Track, TrackId, TrackPoint, TrackSet};
pub use transcript::{Transcript, TranscriptSegment, Word};
