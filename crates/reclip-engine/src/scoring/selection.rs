//! Cross-platform non-overlapping selection.
//!
//! Platforms are processed one at a time in `Platform` order. Every accepted
//! clip joins a shared chosen set that later candidates, on this platform or
//! later ones, are checked against.

use reclip_models::{ExportPlan, Platform, PlannedClip, ScoredCandidate, TimeSpan};
use tracing::{debug, info};

use crate::config::SelectionConfig;
use crate::metrics;

/// Clips accepted so far in one selection run. Only ever grows.
#[derive(Debug, Clone, Default)]
pub struct ChosenSet {
    spans: Vec<(f64, f64)>,
}

impl ChosenSet {
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// True when `span` overlaps no chosen clip by more than `max_ratio`.
    pub fn admits<S: TimeSpan>(&self, span: &S, max_ratio: f64) -> bool {
        self.spans
            .iter()
            .all(|chosen| chosen.overlap_ratio(span) <= max_ratio)
    }

    pub fn insert<S: TimeSpan>(&mut self, span: &S) {
        self.spans.push((span.start(), span.end()));
    }
}

/// Select up to `clips_per_platform` clips per platform.
///
/// `ranked` holds each platform's candidates best first; it is processed in
/// `Platform` order whatever order it arrives in.
pub fn select(
    mut ranked: Vec<(Platform, Vec<ScoredCandidate>)>,
    config: &SelectionConfig,
) -> ExportPlan {
    ranked.sort_by_key(|(platform, _)| *platform);

    let mut chosen = ChosenSet::default();
    let mut plan = ExportPlan::default();

    for (platform, candidates) in ranked {
        let mut accepted: Vec<PlannedClip> = Vec::new();
        for candidate in &candidates {
            if accepted.len() >= config.clips_per_platform {
                break;
            }
            if !chosen.admits(candidate, config.overlap_max_ratio) {
                debug!(
                    platform = %platform,
                    start = candidate.candidate.start,
                    end = candidate.candidate.end,
                    "Skipped overlapping candidate"
                );
                continue;
            }
            chosen.insert(candidate);
            accepted.push(PlannedClip::from_scored(platform, accepted.len() + 1, candidate));
        }

        info!(
            platform = %platform,
            selected = accepted.len(),
            ranked = candidates.len(),
            "Selected clips"
        );
        metrics::record_clips_selected(platform, accepted.len());
        plan.platforms.insert(platform, accepted);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclip_models::{Candidate, CandidateFeatures};

    fn scored(start: f64, end: f64, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate::new(start, end, "text."),
            score,
            features: CandidateFeatures::default(),
        }
    }

    fn config(clips: usize) -> SelectionConfig {
        SelectionConfig {
            platforms: Platform::ALL.to_vec(),
            clips_per_platform: clips,
            overlap_max_ratio: 0.25,
        }
    }

    fn spans(clips: &[PlannedClip]) -> Vec<(f64, f64)> {
        clips.iter().map(|c| (c.start, c.end)).collect()
    }

    #[test]
    fn test_overlapping_runner_up_is_skipped() {
        let ranked = vec![(
            Platform::TikTok,
            vec![scored(0.0, 10.0, 10.0), scored(5.0, 15.0, 9.0), scored(20.0, 30.0, 8.0)],
        )];
        let plan = select(ranked, &config(2));
        let clips = plan.clips_for(Platform::TikTok);
        assert_eq!(spans(clips), vec![(0.0, 10.0), (20.0, 30.0)]);
        assert_eq!(clips[0].clip_index, 1);
        assert_eq!(clips[1].clip_index, 2);
    }

    #[test]
    fn test_guard_spans_platforms() {
        let same = vec![scored(0.0, 10.0, 5.0), scored(40.0, 50.0, 4.0)];
        let ranked = vec![
            (Platform::Reels, same.clone()),
            (Platform::TikTok, same.clone()),
            (Platform::Shorts, same),
        ];
        let plan = select(ranked, &config(1));
        // TikTok goes first regardless of input order
        assert_eq!(spans(plan.clips_for(Platform::TikTok)), vec![(0.0, 10.0)]);
        assert_eq!(spans(plan.clips_for(Platform::Shorts)), vec![(40.0, 50.0)]);
        assert!(plan.clips_for(Platform::Reels).is_empty());
        assert!(plan.platforms.contains_key(&Platform::Reels));
    }

    #[test]
    fn test_selected_clips_pairwise_within_ratio() {
        let pool: Vec<ScoredCandidate> = (0..30)
            .map(|i| {
                let start = i as f64 * 3.0;
                scored(start, start + 12.0, 100.0 - i as f64)
            })
            .collect();
        let ranked = Platform::ALL.iter().map(|p| (*p, pool.clone())).collect();
        let plan = select(ranked, &config(3));
        let all: Vec<&PlannedClip> = plan.clips().collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(a.overlap_ratio(*b) <= 0.25);
            }
        }
        assert!(plan.total_clips() > 3);
    }

    #[test]
    fn test_chosen_set_admits() {
        let mut chosen = ChosenSet::default();
        assert!(chosen.admits(&(0.0, 10.0), 0.0));
        chosen.insert(&(0.0, 10.0));
        assert!(chosen.admits(&(10.0, 20.0), 0.0));
        assert!(!chosen.admits(&(8.0, 20.0), 0.1));
        assert_eq!(chosen.len(), 1);
    }
}
