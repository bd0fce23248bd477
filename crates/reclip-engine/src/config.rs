//! Engine configuration.
//!
//! Every section has defaults so the engine can run from `EngineConfig::default()`.
//! Weight constants are tunable parameters, not contracts.

use reclip_models::{Platform, PlatformMap};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tracker: TrackerConfig,
    pub attribution: AttributionConfig,
    pub candidates: CandidateConfig,
    pub scoring: ScoringConfig,
    pub selection: SelectionConfig,
    pub crop: CropConfig,
}

impl EngineConfig {
    /// Check every section; the first violation is returned.
    pub fn validate(&self) -> EngineResult<()> {
        self.tracker.validate()?;
        self.attribution.validate()?;
        self.candidates.validate()?;
        self.scoring.validate()?;
        self.selection.validate()?;
        self.crop.validate()?;
        Ok(())
    }
}

// === Track Association ===

/// IoU tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Minimum IoU for a detection to continue a track (default: 0.35)
    pub iou_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.35,
        }
    }
}

impl TrackerConfig {
    fn validate(&self) -> EngineResult<()> {
        if !(self.iou_threshold > 0.0 && self.iou_threshold <= 1.0) {
            return Err(EngineError::invalid_config(format!(
                "tracker.iou_threshold must be in (0, 1], got {}",
                self.iou_threshold
            )));
        }
        Ok(())
    }
}

// === Speaker Attribution ===

/// Weights of the per-track speaker score.
///
/// `score = motion * m + presence * p - jitter * j`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakerWeights {
    pub motion: f64,
    pub presence: f64,
    pub jitter: f64,
}

impl Default for SpeakerWeights {
    fn default() -> Self {
        Self {
            motion: 1.2,
            presence: 0.4,
            jitter: 0.6,
        }
    }
}

/// Chunking and hysteresis settings for speaker attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// Chunk width in seconds (default: 0.5)
    pub chunk_size: f64,
    /// Minimum seconds between attribution switches (default: 0.5)
    pub hysteresis_secs: f64,
    /// Minimum score margin over the runner-up to switch (default: 0.15)
    pub confidence_threshold: f64,
    pub weights: SpeakerWeights,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            chunk_size: 0.5,
            hysteresis_secs: 0.5,
            confidence_threshold: 0.15,
            weights: SpeakerWeights::default(),
        }
    }
}

impl AttributionConfig {
    fn validate(&self) -> EngineResult<()> {
        if !(self.chunk_size > 0.0) {
            return Err(EngineError::invalid_config(
                "attribution.chunk_size must be positive",
            ));
        }
        if self.hysteresis_secs < 0.0 || self.confidence_threshold < 0.0 {
            return Err(EngineError::invalid_config(
                "attribution.hysteresis_secs and confidence_threshold must be non-negative",
            ));
        }
        let w = &self.weights;
        if [w.motion, w.presence, w.jitter].iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(EngineError::invalid_config(
                "attribution.weights must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

// === Candidate Generation ===

/// Allowed clip length for one platform, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DurationRange {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub fn contains(&self, duration: f64) -> bool {
        duration >= self.min_secs && duration <= self.max_secs
    }
}

/// Candidate pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Silence gap that starts a new group (default: 0.35s)
    pub pause_threshold_secs: f64,
    /// Drop windowed candidates not ending on sentence punctuation
    pub avoid_mid_sentence_cut: bool,
    /// Largest number of consecutive segments in one window (default: 6)
    pub max_window_segments: usize,
    /// Maximum pool size after filtering (default: 80)
    pub pool_size: usize,
    pub durations: PlatformMap<DurationRange>,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            pause_threshold_secs: 0.35,
            avoid_mid_sentence_cut: true,
            max_window_segments: 6,
            pool_size: 80,
            durations: PlatformMap::new(
                DurationRange::new(15.0, 60.0),
                DurationRange::new(15.0, 60.0),
                DurationRange::new(15.0, 90.0),
            ),
        }
    }
}

impl CandidateConfig {
    /// True when `duration` fits at least one platform's range.
    pub fn fits_any(&self, duration: f64) -> bool {
        self.durations.iter().any(|(_, r)| r.contains(duration))
    }

    /// Smallest minimum and largest maximum across platforms.
    ///
    /// Ranges may be disjoint, so this only bounds group slicing; use
    /// [`fits_any`](Self::fits_any) to filter candidates.
    pub fn duration_hull(&self) -> DurationRange {
        let min = self
            .durations
            .iter()
            .map(|(_, r)| r.min_secs)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .durations
            .iter()
            .map(|(_, r)| r.max_secs)
            .fold(f64::NEG_INFINITY, f64::max);
        DurationRange::new(min, max)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.pause_threshold_secs < 0.0 {
            return Err(EngineError::invalid_config(
                "candidates.pause_threshold_secs must be non-negative",
            ));
        }
        if self.max_window_segments == 0 {
            return Err(EngineError::invalid_config(
                "candidates.max_window_segments must be at least 1",
            ));
        }
        for (platform, range) in self.durations.iter() {
            if !(range.min_secs > 0.0) || range.max_secs < range.min_secs {
                return Err(EngineError::invalid_config(format!(
                    "candidates.durations.{platform}: need 0 < min_secs <= max_secs, got {}..{}",
                    range.min_secs, range.max_secs
                )));
            }
        }
        Ok(())
    }
}

// === Scoring ===

/// Linear weights for one platform.
///
/// Positive weights should sum to about 1.0 so scores are comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub hook_strength: f64,
    pub keyword_hits: f64,
    pub audio_energy_peaks: f64,
    pub speaking_rate: f64,
    pub structure: f64,
    pub novelty: f64,
    pub penalty: f64,
}

impl ScoringWeights {
    pub fn positive_sum(&self) -> f64 {
        self.hook_strength
            + self.keyword_hits
            + self.audio_energy_peaks
            + self.speaking_rate
            + self.structure
            + self.novelty
    }

    fn check(&self, platform: Platform) -> EngineResult<()> {
        let all = [
            self.hook_strength,
            self.keyword_hits,
            self.audio_energy_peaks,
            self.speaking_rate,
            self.structure,
            self.novelty,
            self.penalty,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::invalid_weights(
                platform,
                "weights must be finite and non-negative",
            ));
        }
        if self.positive_sum() <= 0.0 {
            return Err(EngineError::invalid_weights(
                platform,
                "at least one positive feature weight is required",
            ));
        }
        Ok(())
    }
}

/// Niche keyword and call-to-action terms for one platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NicheKeywords {
    pub keywords: Vec<String>,
    pub cta: Vec<String>,
}

/// Scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: PlatformMap<ScoringWeights>,
    pub niches: PlatformMap<NicheKeywords>,
    /// Leading tokens inspected for hook strength (default: 8)
    pub hook_window: usize,
    /// Tokens counted toward the filler penalty
    pub fillers: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: PlatformMap::new(
                ScoringWeights {
                    hook_strength: 0.30,
                    keyword_hits: 0.15,
                    audio_energy_peaks: 0.10,
                    speaking_rate: 0.15,
                    structure: 0.15,
                    novelty: 0.15,
                    penalty: 0.20,
                },
                ScoringWeights {
                    hook_strength: 0.25,
                    keyword_hits: 0.20,
                    audio_energy_peaks: 0.10,
                    speaking_rate: 0.10,
                    structure: 0.20,
                    novelty: 0.15,
                    penalty: 0.20,
                },
                ScoringWeights {
                    hook_strength: 0.25,
                    keyword_hits: 0.15,
                    audio_energy_peaks: 0.15,
                    speaking_rate: 0.10,
                    structure: 0.20,
                    novelty: 0.15,
                    penalty: 0.25,
                },
            ),
            niches: PlatformMap::default(),
            hook_window: 8,
            fillers: ["um", "uh", "like", "you", "know", "so"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> EngineResult<()> {
        for (platform, weights) in self.weights.iter() {
            weights.check(platform)?;
        }
        if self.hook_window == 0 {
            return Err(EngineError::invalid_config(
                "scoring.hook_window must be at least 1",
            ));
        }
        Ok(())
    }
}

// === Selection ===

/// Cross-platform selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Platforms to export; selection always runs them in `Platform` order
    pub platforms: Vec<Platform>,
    pub clips_per_platform: usize,
    /// Largest allowed overlap ratio against any already chosen clip
    pub overlap_max_ratio: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            clips_per_platform: 3,
            overlap_max_ratio: 0.25,
        }
    }
}

impl SelectionConfig {
    /// Requested platforms, deduplicated, in processing order.
    pub fn ordered_platforms(&self) -> Vec<Platform> {
        let mut platforms = self.platforms.clone();
        platforms.sort();
        platforms.dedup();
        platforms
    }

    fn validate(&self) -> EngineResult<()> {
        if self.platforms.is_empty() {
            return Err(EngineError::invalid_config(
                "selection.platforms must name at least one platform",
            ));
        }
        if !(0.0..=1.0).contains(&self.overlap_max_ratio) {
            return Err(EngineError::invalid_config(format!(
                "selection.overlap_max_ratio must be in [0, 1], got {}",
                self.overlap_max_ratio
            )));
        }
        Ok(())
    }
}

// === Crop Path ===

/// Virtual camera settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Source frame width in pixels
    pub frame_width: u32,
    /// Source frame height in pixels
    pub frame_height: u32,
    /// Output width / height (default: 9/16)
    pub output_aspect: f64,
    /// Extra room around the face when choosing zoom (default: 0.15)
    pub safe_margin: f64,
    /// Tightest allowed zoom (default: 0.4)
    pub min_scale: f64,
    /// Pan limit in frame dimensions per second (default: 0.18)
    pub max_pan_speed: f64,
    /// Zoom limit in scale units per second (default: 0.15)
    pub max_zoom_rate: f64,
    /// Blend factor toward the next raw keyframe (default: 0.35)
    pub smoothing_alpha: f64,
    /// Per-platform share of the pan and zoom limits, in (0, 1]
    pub platform_motion: PlatformMap<f64>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            frame_width: 1920,
            frame_height: 1080,
            output_aspect: 9.0 / 16.0,
            safe_margin: 0.15,
            min_scale: 0.4,
            max_pan_speed: 0.18,
            max_zoom_rate: 0.15,
            smoothing_alpha: 0.35,
            platform_motion: PlatformMap::new(1.0, 1.0, 0.8),
        }
    }
}

impl CropConfig {
    /// Pan and zoom limits for clips exported to `platform`.
    pub fn motion_limits(&self, platform: Platform) -> (f64, f64) {
        let factor = *self.platform_motion.get(platform);
        (self.max_pan_speed * factor, self.max_zoom_rate * factor)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(EngineError::invalid_config("crop frame size must be non-zero"));
        }
        if !(self.output_aspect > 0.0) {
            return Err(EngineError::invalid_config("crop.output_aspect must be positive"));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(EngineError::invalid_config("crop.min_scale must be in (0, 1]"));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(EngineError::invalid_config(
                "crop.smoothing_alpha must be in (0, 1]",
            ));
        }
        if self.max_pan_speed < 0.0 || self.max_zoom_rate < 0.0 || self.safe_margin < 0.0 {
            return Err(EngineError::invalid_config(
                "crop speed limits and safe_margin must be non-negative",
            ));
        }
        if self.platform_motion.iter().any(|(_, f)| !(*f > 0.0 && *f <= 1.0)) {
            return Err(EngineError::invalid_config(
                "crop.platform_motion factors must be in (0, 1]",
            ));
        }
        Ok(())
    }
}
