//! Speaker timeline produced by attribution.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::span::TimeSpan;
use crate::track::TrackId;

/// Fixed-width time bucket with at most one attributed track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeakerChunk {
    pub start: f64,
    pub end: f64,
    /// Attributed track; `None` outside speech or before any attribution
    pub track_id: Option<TrackId>,
    /// Best track score in this chunk (0 when no track was scored)
    pub confidence: f64,
}

impl TimeSpan for SpeakerChunk {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Contiguous, time-ordered chunks covering `[0, max_observed_time]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeakerTimeline {
    pub chunks: Vec<SpeakerChunk>,
}

impl SpeakerTimeline {
    pub fn new(chunks: Vec<SpeakerChunk>) -> Self {
        Self { chunks }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunks sharing a positive-length interval with `[start, end]`.
    pub fn overlapping(&self, start: f64, end: f64) -> impl Iterator<Item = &SpeakerChunk> {
        self.chunks.iter().filter(move |c| c.overlaps(&(start, end)))
    }

    /// Number of times the attributed track changes between consecutive
    /// attributed chunks.
    pub fn switch_count(&self) -> usize {
        let mut last: Option<TrackId> = None;
        let mut switches = 0;
        for id in self.chunks.iter().filter_map(|c| c.track_id) {
            if matches!(last, Some(prev) if prev != id) {
                switches += 1;
            }
            last = Some(id);
        }
        switches
    }
}
