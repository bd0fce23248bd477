//! Command-line worker for the reclip reframing engine.
//!
//! Loads configuration and pre-computed inputs, runs the engine and writes
//! the analysis, export plan, crop and caption artifacts.

pub mod config;
pub mod error;
pub mod export;
pub mod inputs;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod subtitles;

pub use config::{AppConfig, SubtitleConfig, SubtitleTemplate};
pub use error::{WorkerError, WorkerResult};
pub use export::{ArtifactLayout, RunManifest};
pub use inputs::{FaceInput, PipelineInputs};
pub use logging::{init_tracing, LogFormat, StageLogger};
pub use pipeline::{run_analysis, run_plan, RunSummary};
