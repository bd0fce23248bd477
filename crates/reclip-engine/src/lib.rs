//! Attribution and reframing engine.
//!
//! This crate provides:
//! - IoU track association over per-frame face boxes
//! - Chunk-wise speaker attribution with hysteresis
//! - Transcript candidate generation
//! - Per-platform scoring and cross-platform non-overlapping selection
//! - Speed-limited crop path synthesis with piecewise-linear expressions

pub mod candidates;
pub mod config;
pub mod crop;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod scoring;
pub mod speaker;
pub mod stats;
pub mod tracking;

pub use config::{
    AttributionConfig, CandidateConfig, CropConfig, DurationRange, EngineConfig, NicheKeywords,
    ScoringConfig, ScoringWeights, SelectionConfig, SpeakerWeights, TrackerConfig,
};
pub use engine::{Analysis, ClipCrop, ReframeEngine, RunOutput};
pub use error::{EngineError, EngineResult};
