//! Batch facade wiring the stages together.
//!
//! Track association and candidate generation are independent and run
//! under `rayon::join`. Platforms are ranked in parallel but selected
//! sequentially. Crop paths are planned per clip in parallel.

use std::time::Instant;

use rayon::prelude::*;
use reclip_models::{
    Candidate, CropPath, ExportPlan, FaceFrame, Platform, PlannedClip, ScoredCandidate,
    SpeakerTimeline, SpeechWindow, TrackSet, Transcript,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::candidates::CandidateGenerator;
use crate::config::EngineConfig;
use crate::crop::{CropExpression, CropPlanner};
use crate::error::EngineResult;
use crate::metrics;
use crate::scoring::{self, FeatureExtractor, Scorer};
use crate::speaker::{MotionProxy, SpeakerAttributor};
use crate::tracking::IouTracker;

/// Output of the analysis stages.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub tracks: TrackSet,
    pub timeline: SpeakerTimeline,
    pub candidates: Vec<Candidate>,
}

/// A selected clip with its crop path and renderer expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipCrop {
    pub clip: PlannedClip,
    pub path: CropPath,
    pub expression: CropExpression,
    /// Ready-to-use `crop` filter
    pub filter: String,
}

/// Everything one full run produces.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub analysis: Analysis,
    pub ranked: Vec<(Platform, Vec<ScoredCandidate>)>,
    pub plan: ExportPlan,
    pub crops: Vec<ClipCrop>,
}

/// The attribution and reframing engine.
pub struct ReframeEngine {
    config: EngineConfig,
    tracker: IouTracker,
    attributor: SpeakerAttributor,
    generator: CandidateGenerator,
    scorer: Scorer,
    planner: CropPlanner,
}

impl ReframeEngine {
    /// Validate the configuration and build every stage.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            tracker: IouTracker::from_config(&config.tracker),
            attributor: SpeakerAttributor::new(config.attribution.clone()),
            generator: CandidateGenerator::new(config.candidates.clone()),
            scorer: Scorer::new(&config),
            planner: CropPlanner::new(config.crop.clone()),
            config,
        })
    }

    pub fn with_motion_proxy(mut self, proxy: Box<dyn MotionProxy>) -> Self {
        self.attributor = self.attributor.with_motion_proxy(proxy);
        self
    }

    pub fn with_feature_extractor(mut self, extractor: Box<dyn FeatureExtractor>) -> Self {
        self.scorer = Scorer::with_extractor(&self.config, extractor);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tracks, speaker timeline and candidate pool.
    pub fn analyze(
        &self,
        faces: &[FaceFrame],
        speech: &[SpeechWindow],
        transcript: &Transcript,
    ) -> Analysis {
        let (tracks, candidates) = rayon::join(
            || timed("tracking", || self.tracker.associate(faces)),
            || timed("candidates", || self.generator.generate(transcript, speech)),
        );
        let timeline = timed("attribution", || self.attributor.attribute(&tracks, speech));

        metrics::record_tracks_created(tracks.len());
        metrics::record_speaker_switches(timeline.switch_count());
        metrics::record_candidates(candidates.len());
        info!(
            tracks = tracks.len(),
            chunks = timeline.chunks.len(),
            switches = timeline.switch_count(),
            candidates = candidates.len(),
            motion_proxy = self.attributor.motion_proxy_name(),
            "Analysis complete"
        );

        Analysis {
            tracks,
            timeline,
            candidates,
        }
    }

    /// Rank candidates per platform, then select across platforms.
    pub fn select(
        &self,
        candidates: &[Candidate],
    ) -> (Vec<(Platform, Vec<ScoredCandidate>)>, ExportPlan) {
        let platforms = self.config.selection.ordered_platforms();
        let ranked = timed("scoring", || self.scorer.rank_all(candidates, &platforms));
        let plan = timed("selection", || {
            scoring::select(ranked.clone(), &self.config.selection)
        });
        info!(
            extractor = self.scorer.extractor_name(),
            clips = plan.total_clips(),
            "Selection complete"
        );
        (ranked, plan)
    }

    /// Crop path for every clip in the plan, in plan order.
    pub fn plan_crops(&self, analysis: &Analysis, plan: &ExportPlan) -> Vec<ClipCrop> {
        let geometry = self.planner.geometry();
        let clips: Vec<&PlannedClip> = plan.clips().collect();
        timed("crop", || {
            clips
                .par_iter()
                .map(|clip| {
                    let path = self.planner.plan(&analysis.tracks, &analysis.timeline, clip);
                    let expression = CropExpression::from_path(&path, &geometry);
                    ClipCrop {
                        clip: (*clip).clone(),
                        filter: expression.filter(),
                        path,
                        expression,
                    }
                })
                .collect()
        })
    }

    /// Run every stage.
    pub fn run(
        &self,
        faces: &[FaceFrame],
        speech: &[SpeechWindow],
        transcript: &Transcript,
    ) -> RunOutput {
        let analysis = self.analyze(faces, speech, transcript);
        let (ranked, plan) = self.select(&analysis.candidates);
        let crops = self.plan_crops(&analysis, &plan);
        RunOutput {
            analysis,
            ranked,
            plan,
            crops,
        }
    }
}

fn timed<T>(stage: &'static str, f: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let out = f();
    metrics::record_stage_duration(stage, started.elapsed().as_secs_f64());
    out
}
