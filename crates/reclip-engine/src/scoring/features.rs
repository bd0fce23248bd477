//! Candidate feature extraction.

use std::collections::HashSet;

use reclip_models::{Candidate, CandidateFeatures, Platform, PlatformMap, TimeSpan};

use super::signals::SampledSignal;
use crate::candidates::ends_sentence;
use crate::config::ScoringConfig;
use crate::stats::safe_ratio;

/// Value used for audio energy and novelty when no signal is supplied.
const NEUTRAL_SIGNAL: f64 = 0.5;

/// Computes the named features for one candidate on one platform.
pub trait FeatureExtractor: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    fn extract(&self, candidate: &Candidate, platform: Platform) -> CandidateFeatures;
}

/// Lowercase a token and strip punctuation from both ends.
pub fn normalize_token(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

fn is_title_case(token: &str) -> bool {
    let word = token.trim_matches(|c: char| !c.is_alphanumeric());
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => !chars.any(char::is_uppercase),
        _ => false,
    }
}

fn is_high_signal(token: &str) -> bool {
    let normalized = normalize_token(token);
    normalized.chars().any(|c| c.is_ascii_digit())
        || normalized.chars().count() > 6
        || is_title_case(token)
}

/// Token and punctuation heuristics with optional external signals.
#[derive(Debug, Clone)]
pub struct HeuristicFeatureExtractor {
    keywords: PlatformMap<HashSet<String>>,
    fillers: HashSet<String>,
    hook_window: usize,
    audio_energy: Option<SampledSignal>,
    novelty: Option<SampledSignal>,
}

impl HeuristicFeatureExtractor {
    pub fn new(config: &ScoringConfig) -> Self {
        let keywords = config.niches.map(|_, niche| {
            niche
                .keywords
                .iter()
                .chain(niche.cta.iter())
                .map(|k| normalize_token(k))
                .filter(|k| !k.is_empty())
                .collect()
        });
        let fillers = config.fillers.iter().map(|f| normalize_token(f)).collect();
        Self {
            keywords,
            fillers,
            hook_window: config.hook_window.max(1),
            audio_energy: None,
            novelty: None,
        }
    }

    pub fn with_audio_energy(mut self, signal: SampledSignal) -> Self {
        self.audio_energy = Some(signal);
        self
    }

    pub fn with_novelty(mut self, signal: SampledSignal) -> Self {
        self.novelty = Some(signal);
        self
    }

    /// Share of high-signal tokens among the first `hook_window` tokens.
    fn hook_strength(&self, tokens: &[String]) -> f64 {
        let head = &tokens[..tokens.len().min(self.hook_window)];
        let signal = head.iter().filter(|t| is_high_signal(t)).count();
        safe_ratio(signal as f64, head.len() as f64)
    }

    fn keyword_hits(&self, normalized: &[String], platform: Platform) -> f64 {
        let keywords = self.keywords.get(platform);
        let hits = normalized.iter().filter(|t| keywords.contains(*t)).count();
        safe_ratio(hits as f64, normalized.len() as f64)
    }

    fn penalty(&self, normalized: &[String]) -> f64 {
        let hits = normalized.iter().filter(|t| self.fillers.contains(*t)).count();
        safe_ratio(hits as f64, normalized.len() as f64)
    }

    fn signal_over(signal: Option<&SampledSignal>, candidate: &Candidate) -> f64 {
        signal
            .and_then(|s| s.mean_over(candidate.start, candidate.end))
            .unwrap_or(NEUTRAL_SIGNAL)
    }
}

/// 1.0 for a sentence ending, 0.7 for a clause ending, 0.4 otherwise.
fn structure(text: &str) -> f64 {
    if ends_sentence(text) {
        1.0
    } else if text.trim_end().ends_with(&[',', ';', ':'][..]) {
        0.7
    } else {
        0.4
    }
}

impl FeatureExtractor for HeuristicFeatureExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn extract(&self, candidate: &Candidate, platform: Platform) -> CandidateFeatures {
        let normalized: Vec<String> = candidate
            .tokens
            .iter()
            .map(|t| normalize_token(t))
            .collect();

        CandidateFeatures {
            hook_strength: self.hook_strength(&candidate.tokens),
            keyword_hits: self.keyword_hits(&normalized, platform),
            audio_energy_peaks: Self::signal_over(self.audio_energy.as_ref(), candidate),
            speaking_rate: safe_ratio(candidate.tokens.len() as f64, candidate.duration()),
            structure: structure(&candidate.text),
            novelty: Self::signal_over(self.novelty.as_ref(), candidate),
            penalty: self.penalty(&normalized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NicheKeywords;
    use crate::scoring::signals::SignalSample;

    fn extractor() -> HeuristicFeatureExtractor {
        let mut config = ScoringConfig::default();
        config.niches.tiktok = NicheKeywords {
            keywords: vec!["growth".into()],
            cta: vec!["Follow".into()],
        };
        HeuristicFeatureExtractor::new(&config)
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("\"Growth!\""), "growth");
        assert_eq!(normalize_token("don't,"), "don't");
        assert_eq!(normalize_token("..."), "");
    }

    #[test]
    fn test_high_signal_tokens() {
        assert!(is_high_signal("2024"));
        assert!(is_high_signal("$10k"));
        assert!(is_high_signal("incredible"));
        assert!(is_high_signal("Big"));
        assert!(!is_high_signal("growth"));
        assert!(!is_high_signal("NASA"));
    }

    #[test]
    fn test_features_of_keyword_sentence() {
        let c = Candidate::new(0.0, 10.0, "Big growth story.");
        let f = extractor().extract(&c, Platform::TikTok);
        assert!((f.hook_strength - 1.0 / 3.0).abs() < 1e-12);
        assert!((f.keyword_hits - 1.0 / 3.0).abs() < 1e-12);
        assert!((f.speaking_rate - 0.3).abs() < 1e-12);
        assert_eq!(f.structure, 1.0);
        assert_eq!(f.audio_energy_peaks, 0.5);
        assert_eq!(f.novelty, 0.5);
        assert_eq!(f.penalty, 0.0);
    }

    #[test]
    fn test_keywords_are_per_platform() {
        let c = Candidate::new(0.0, 10.0, "follow for growth");
        let e = extractor();
        assert!((e.extract(&c, Platform::TikTok).keyword_hits - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(e.extract(&c, Platform::Reels).keyword_hits, 0.0);
    }

    #[test]
    fn test_filler_penalty_and_soft_structure() {
        let c = Candidate::new(0.0, 4.0, "um so like, yeah,");
        let f = extractor().extract(&c, Platform::Shorts);
        assert!((f.penalty - 0.75).abs() < 1e-12);
        assert_eq!(f.structure, 0.7);
        assert_eq!(structure("no ending here"), 0.4);
    }

    #[test]
    fn test_zero_duration_and_empty_text() {
        let c = Candidate::new(3.0, 3.0, "");
        let f = extractor().extract(&c, Platform::TikTok);
        assert_eq!(f.speaking_rate, 0.0);
        assert_eq!(f.hook_strength, 0.0);
        assert_eq!(f.keyword_hits, 0.0);
    }

    #[test]
    fn test_audio_signal_replaces_constant() {
        let e = extractor().with_audio_energy(SampledSignal::new(vec![
            SignalSample { time: 1.0, value: 0.9 },
            SignalSample { time: 2.0, value: 0.7 },
        ]));
        let f = e.extract(&Candidate::new(0.0, 5.0, "Loud part."), Platform::TikTok);
        assert!((f.audio_energy_peaks - 0.8).abs() < 1e-12);
        assert_eq!(f.novelty, 0.5);
    }
}
