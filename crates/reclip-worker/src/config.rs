//! Worker configuration.
//!
//! Loaded from a YAML, TOML or JSON file and overlaid with `RECLIP__`
//! environment variables (`RECLIP__SELECTION__CLIPS_PER_PLATFORM=5`).
//! Scoring weights and niche keyword tables have no defaults: every
//! platform must be present in the file.

use std::path::Path;

use reclip_engine::{
    AttributionConfig, CandidateConfig, CropConfig, EngineConfig, NicheKeywords, ScoringConfig,
    ScoringWeights, SelectionConfig, TrackerConfig,
};
use reclip_models::PlatformMap;
use serde::{Deserialize, Serialize};

use crate::error::{WorkerError, WorkerResult};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "RECLIP";

/// Complete worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub attribution: AttributionConfig,
    #[serde(default)]
    pub candidates: CandidateConfig,
    pub scoring: ScoringSection,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub crop: CropConfig,
    #[serde(default)]
    pub subtitles: SubtitleConfig,
    #[serde(default)]
    pub templates: PlatformMap<SubtitleTemplate>,
}

/// Face sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Target rate of face frames fed to the tracker
    pub face_analysis_fps: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            face_analysis_fps: 12.0,
        }
    }
}

/// Scoring tables as they appear in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSection {
    pub weights: PlatformMap<ScoringWeights>,
    pub niches: PlatformMap<NicheKeywords>,
    #[serde(default = "default_hook_window")]
    pub hook_window: usize,
    #[serde(default = "default_fillers")]
    pub fillers: Vec<String>,
}

fn default_hook_window() -> usize {
    ScoringConfig::default().hook_window
}

fn default_fillers() -> Vec<String> {
    ScoringConfig::default().fillers
}

/// Caption layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    pub max_lines: usize,
    pub max_chars_per_line: usize,
    /// Colour niche keywords in the ASS output
    pub highlight: bool,
    /// Side margins as a share of the 1080px play width
    pub safe_margin_ratio: f64,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_lines: 2,
            max_chars_per_line: 26,
            highlight: true,
            safe_margin_ratio: 0.08,
        }
    }
}

/// ASS style for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleTemplate {
    pub font: String,
    pub font_size: u32,
    /// ASS colour, e.g. `&H00FFFFFF`
    pub primary_color: String,
    pub outline_color: String,
    pub highlight_color: String,
    pub outline: u32,
    pub shadow: u32,
    pub bold: bool,
    /// Draw an opaque box behind the text
    pub boxed: bool,
    pub box_color: String,
}

impl Default for SubtitleTemplate {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 64,
            primary_color: "&H00FFFFFF".to_string(),
            outline_color: "&H00000000".to_string(),
            highlight_color: "&H0000FFFF".to_string(),
            outline: 3,
            shadow: 0,
            bold: true,
            boxed: false,
            box_color: "&H80000000".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, then apply environment overrides.
    pub fn load(path: &Path) -> WorkerResult<Self> {
        if !path.exists() {
            return Err(WorkerError::config_error(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let app: AppConfig = settings.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    /// Engine configuration for a source frame of the given size.
    pub fn engine_config(&self, frame_width: u32, frame_height: u32) -> EngineConfig {
        EngineConfig {
            tracker: self.tracker.clone(),
            attribution: self.attribution.clone(),
            candidates: self.candidates.clone(),
            scoring: ScoringConfig {
                weights: self.scoring.weights.clone(),
                niches: self.scoring.niches.clone(),
                hook_window: self.scoring.hook_window,
                fillers: self.scoring.fillers.clone(),
            },
            selection: self.selection.clone(),
            crop: CropConfig {
                frame_width,
                frame_height,
                ..self.crop.clone()
            },
        }
    }

    /// Check worker settings and the engine settings they produce.
    pub fn validate(&self) -> WorkerResult<()> {
        if !(self.analysis.face_analysis_fps > 0.0) {
            return Err(WorkerError::config_error(
                "analysis.face_analysis_fps must be positive",
            ));
        }
        if self.subtitles.max_lines == 0 || self.subtitles.max_chars_per_line == 0 {
            return Err(WorkerError::config_error(
                "subtitles.max_lines and max_chars_per_line must be at least 1",
            ));
        }
        self.engine_config(self.crop.frame_width, self.crop.frame_height)
            .validate()?;
        Ok(())
    }
}
