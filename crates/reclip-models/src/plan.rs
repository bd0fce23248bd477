//! Per-platform export plan.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::candidate::{CandidateFeatures, ScoredCandidate};
use crate::platform::Platform;
use crate::span::TimeSpan;

/// A selected clip with its 1-based position in its platform's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlannedClip {
    pub platform: Platform,
    pub clip_index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub score: f64,
    pub features: CandidateFeatures,
}

impl PlannedClip {
    pub fn from_scored(platform: Platform, clip_index: usize, scored: &ScoredCandidate) -> Self {
        Self {
            platform,
            clip_index,
            start: scored.candidate.start,
            end: scored.candidate.end,
            text: scored.candidate.text.clone(),
            score: scored.score,
            features: scored.features,
        }
    }

    /// File stem used for every artifact of this clip.
    pub fn file_stem(&self) -> String {
        format!("clip_{:02}", self.clip_index)
    }
}

impl TimeSpan for PlannedClip {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Selected clips per platform, each list in acceptance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportPlan {
    pub platforms: BTreeMap<Platform, Vec<PlannedClip>>,
}

impl ExportPlan {
    pub fn clips_for(&self, platform: Platform) -> &[PlannedClip] {
        self.platforms
            .get(&platform)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every clip, platforms in processing order.
    pub fn clips(&self) -> impl Iterator<Item = &PlannedClip> {
        self.platforms.values().flatten()
    }

    pub fn total_clips(&self) -> usize {
        self.platforms.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;

    #[test]
    fn test_plan_serializes_platform_keys() {
        let scored = ScoredCandidate {
            candidate: Candidate::new(0.0, 10.0, "Hello there."),
            score: 0.5,
            features: CandidateFeatures::default(),
        };
        let mut plan = ExportPlan::default();
        plan.platforms
            .insert(Platform::TikTok, vec![PlannedClip::from_scored(Platform::TikTok, 1, &scored)]);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["platforms"]["tiktok"][0]["clip_index"], 1);
        assert_eq!(plan.clips_for(Platform::Reels).len(), 0);
        assert_eq!(plan.clips().next().unwrap().file_stem(), "clip_01");
    }
}
