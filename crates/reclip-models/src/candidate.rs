//! Clip candidates and their per-platform scores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::span::TimeSpan;

/// A time-bounded span of transcript considered as a potential clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Candidate {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl Candidate {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = text.split_whitespace().map(str::to_string).collect();
        Self {
            start,
            end,
            text,
            tokens,
        }
    }
}

impl TimeSpan for Candidate {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Named inputs to the weighted score.
///
/// All are roughly in `[0, 1]` except `speaking_rate` (tokens per second).
/// `penalty` is subtracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateFeatures {
    pub hook_strength: f64,
    pub keyword_hits: f64,
    pub audio_energy_peaks: f64,
    pub speaking_rate: f64,
    pub structure: f64,
    pub novelty: f64,
    pub penalty: f64,
}

/// A candidate ranked for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: f64,
    pub features: CandidateFeatures,
}

impl TimeSpan for ScoredCandidate {
    fn start(&self) -> f64 {
        self.candidate.start
    }

    fn end(&self) -> f64 {
        self.candidate.end
    }
}
