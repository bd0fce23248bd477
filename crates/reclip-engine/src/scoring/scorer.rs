//! Weighted linear scoring and per-platform ranking.

use rayon::prelude::*;
use reclip_models::{
    Candidate, CandidateFeatures, Platform, PlatformMap, ScoredCandidate, TimeSpan,
};
use tracing::debug;

use super::features::{FeatureExtractor, HeuristicFeatureExtractor};
use crate::config::{DurationRange, EngineConfig, ScoringWeights};

/// Weighted sum of the positive features minus the weighted penalty.
pub fn weighted_score(weights: &ScoringWeights, f: &CandidateFeatures) -> f64 {
    weights.hook_strength * f.hook_strength
        + weights.keyword_hits * f.keyword_hits
        + weights.audio_energy_peaks * f.audio_energy_peaks
        + weights.speaking_rate * f.speaking_rate
        + weights.structure * f.structure
        + weights.novelty * f.novelty
        - weights.penalty * f.penalty
}

/// Ranks candidates for each platform.
pub struct Scorer {
    weights: PlatformMap<ScoringWeights>,
    durations: PlatformMap<DurationRange>,
    extractor: Box<dyn FeatureExtractor>,
}

impl Scorer {
    /// Scorer using the heuristic feature extractor.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_extractor(
            config,
            Box::new(HeuristicFeatureExtractor::new(&config.scoring)),
        )
    }

    pub fn with_extractor(config: &EngineConfig, extractor: Box<dyn FeatureExtractor>) -> Self {
        Self {
            weights: config.scoring.weights.clone(),
            durations: config.candidates.durations.clone(),
            extractor,
        }
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Score one candidate for one platform, ignoring duration limits.
    pub fn score(&self, candidate: &Candidate, platform: Platform) -> ScoredCandidate {
        let features = self.extractor.extract(candidate, platform);
        ScoredCandidate {
            candidate: candidate.clone(),
            score: weighted_score(self.weights.get(platform), &features),
            features,
        }
    }

    /// Candidates within the platform's duration range, best first.
    ///
    /// Equal scores keep pool order.
    pub fn rank(&self, candidates: &[Candidate], platform: Platform) -> Vec<ScoredCandidate> {
        let range = self.durations.get(platform);
        let mut ranked: Vec<ScoredCandidate> = candidates
            .iter()
            .filter(|c| c.duration() > 0.0 && range.contains(c.duration()))
            .map(|c| self.score(c, platform))
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(
            platform = %platform,
            eligible = ranked.len(),
            pool = candidates.len(),
            "Ranked candidates"
        );
        ranked
    }

    /// Rank every platform in parallel. Output follows `platforms` order.
    pub fn rank_all(
        &self,
        candidates: &[Candidate],
        platforms: &[Platform],
    ) -> Vec<(Platform, Vec<ScoredCandidate>)> {
        platforms
            .par_iter()
            .map(|&platform| (platform, self.rank(candidates, platform)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NicheKeywords;

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.candidates.durations = PlatformMap::uniform(DurationRange::new(1.0, 60.0));
        config.scoring.niches.tiktok = NicheKeywords {
            keywords: vec!["growth".into()],
            cta: vec![],
        };
        config
    }

    #[test]
    fn test_keyword_sentence_outscores_short_reply() {
        let scorer = Scorer::new(&config());
        let a = scorer.score(&Candidate::new(0.0, 10.0, "Big growth story."), Platform::TikTok);
        let b = scorer.score(&Candidate::new(12.0, 20.0, "ok."), Platform::TikTok);
        assert!(a.score > b.score);
        assert!(a.features.keyword_hits > b.features.keyword_hits);
        assert!(a.features.hook_strength > b.features.hook_strength);
    }

    #[test]
    fn test_weighted_score_subtracts_penalty() {
        let weights = ScoringWeights {
            hook_strength: 1.0,
            keyword_hits: 0.0,
            audio_energy_peaks: 0.0,
            speaking_rate: 0.0,
            structure: 0.0,
            novelty: 0.0,
            penalty: 0.5,
        };
        let features = CandidateFeatures {
            hook_strength: 0.8,
            penalty: 0.4,
            ..CandidateFeatures::default()
        };
        assert!((weighted_score(&weights, &features) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_rank_filters_duration_and_keeps_tie_order() {
        let mut config = config();
        config.candidates.durations.shorts = DurationRange::new(5.0, 20.0);
        let scorer = Scorer::new(&config);
        let pool = vec![
            Candidate::new(0.0, 10.0, "same words here."),
            Candidate::new(20.0, 22.0, "too short."),
            Candidate::new(30.0, 40.0, "same words here."),
            Candidate::new(50.0, 50.0, ""),
        ];
        let ranked = scorer.rank(&pool, Platform::Shorts);
        let starts: Vec<f64> = ranked.iter().map(|s| s.candidate.start).collect();
        assert_eq!(starts, vec![0.0, 30.0]);
    }

    #[test]
    fn test_rank_all_follows_platform_order() {
        let scorer = Scorer::new(&config());
        let pool = vec![Candidate::new(0.0, 10.0, "Some text.")];
        let ranked = scorer.rank_all(&pool, Platform::ALL);
        let order: Vec<Platform> = ranked.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, Platform::ALL.to_vec());
    }
}
