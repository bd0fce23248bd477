//! Engine metrics.
//!
//! Counters and histograms for each stage of a run:
//! - Tracks created by association
//! - Speaker switches in the timeline
//! - Candidates generated and clips selected per platform
//! - Stage durations

use metrics::{counter, histogram};
use reclip_models::Platform;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Tracks allocated by IoU association.
    pub const TRACKS_CREATED_TOTAL: &str = "reclip_tracks_created_total";

    /// Attribution changes between consecutive attributed chunks.
    pub const SPEAKER_SWITCHES_TOTAL: &str = "reclip_speaker_switches_total";

    /// Candidates left in the pool after filtering and capping.
    pub const CANDIDATES_GENERATED_TOTAL: &str = "reclip_candidates_generated_total";

    /// Clips accepted by selection, by platform.
    pub const CLIPS_SELECTED_TOTAL: &str = "reclip_clips_selected_total";

    /// Wall time of a pipeline stage in seconds, by stage.
    pub const STAGE_DURATION_SECONDS: &str = "reclip_stage_duration_seconds";
}

// =============================================================================
// Recording Functions
// =============================================================================

pub fn record_tracks_created(count: usize) {
    counter!(names::TRACKS_CREATED_TOTAL).increment(count as u64);
}

pub fn record_speaker_switches(count: usize) {
    counter!(names::SPEAKER_SWITCHES_TOTAL).increment(count as u64);
}

pub fn record_candidates(count: usize) {
    counter!(names::CANDIDATES_GENERATED_TOTAL).increment(count as u64);
}

/// Record the clips accepted for one platform.
pub fn record_clips_selected(platform: Platform, count: usize) {
    counter!(
        names::CLIPS_SELECTED_TOTAL,
        "platform" => platform.as_str()
    )
    .increment(count as u64);
}

/// Record how long a stage took.
pub fn record_stage_duration(stage: &'static str, seconds: f64) {
    histogram!(
        names::STAGE_DURATION_SECONDS,
        "stage" => stage
    )
    .record(seconds);
}

// =============================================================================
// Tests
// =============================================================================
