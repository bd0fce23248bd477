//! Per-chunk track scoring and the attribution fold.

use rayon::prelude::*;
use reclip_models::{SpeakerChunk, SpeakerTimeline, SpeechWindow, TrackId, TrackPoint, TrackSet};
use tracing::debug;

use super::hysteresis::{AttributionState, Hysteresis};
use super::motion::{BoxAreaVariance, MotionProxy};
use crate::config::{AttributionConfig, SpeakerWeights};
use crate::stats::{mean, safe_ratio};

/// Per-track measures inside one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackMeasures {
    pub track_id: TrackId,
    /// Share of the track's observations that fall in the chunk
    pub presence: f64,
    pub motion: f64,
    /// Mean center displacement between consecutive observations, in pixels
    pub jitter: f64,
    pub score: f64,
}

/// Winner of one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkRanking {
    pub best: TrackId,
    pub best_score: f64,
    /// Best score minus the runner-up, or the best score when unopposed
    pub margin: f64,
}

impl ChunkRanking {
    /// Rank measures by score, highest first. Equal scores favour the lower
    /// track id.
    pub fn from_measures(measures: &[TrackMeasures]) -> Option<Self> {
        let mut ranked: Vec<&TrackMeasures> = measures.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.track_id.cmp(&b.track_id))
        });
        let best = ranked.first()?;
        let margin = match ranked.get(1) {
            Some(second) => best.score - second.score,
            None => best.score,
        };
        Some(Self {
            best: best.track_id,
            best_score: best.score,
            margin,
        })
    }
}

/// Fixed-width chunks covering `[0, total]`.
///
/// Starts are computed as `i * chunk_size` so long timelines do not drift.
/// The final chunk is truncated at `total`.
pub fn chunk_bounds(total: f64, chunk_size: f64) -> Vec<(f64, f64)> {
    if !(total > 0.0 && chunk_size > 0.0) {
        return Vec::new();
    }
    let count = (total / chunk_size).ceil() as usize;
    (0..count)
        .map(|i| {
            let start = i as f64 * chunk_size;
            let end = ((i + 1) as f64 * chunk_size).min(total);
            (start, end)
        })
        .filter(|(start, end)| end > start)
        .collect()
}

/// Builds the speaker timeline from tracks and speech windows.
pub struct SpeakerAttributor {
    config: AttributionConfig,
    motion: Box<dyn MotionProxy>,
}

impl SpeakerAttributor {
    /// Attributor using the box-area motion proxy.
    pub fn new(config: AttributionConfig) -> Self {
        Self {
            config,
            motion: Box::new(BoxAreaVariance),
        }
    }

    /// Replace the motion proxy, e.g. with raw-frame mouth motion.
    pub fn with_motion_proxy(mut self, proxy: Box<dyn MotionProxy>) -> Self {
        self.motion = proxy;
        self
    }

    pub fn motion_proxy_name(&self) -> &'static str {
        self.motion.name()
    }

    /// Score every track with at least one observation in the chunk.
    ///
    /// The chunk is `[start, end)`, or `[start, end]` when `closed`.
    pub fn measure(
        &self,
        tracks: &TrackSet,
        start: f64,
        end: f64,
        closed: bool,
    ) -> Vec<TrackMeasures> {
        let weights = self.config.weights;
        tracks
            .iter()
            .filter_map(|track| {
                let inside = track.points_in(start, end, closed);
                if inside.is_empty() {
                    return None;
                }
                let presence = safe_ratio(inside.len() as f64, track.len() as f64);
                let motion = self.motion.motion(inside);
                let jitter = center_jitter(inside);
                Some(TrackMeasures {
                    track_id: track.id,
                    presence,
                    motion,
                    jitter,
                    score: speaker_score(&weights, motion, presence, jitter),
                })
            })
            .collect()
    }

    /// Attribute chunks covering `[0, last observation]`.
    pub fn attribute(&self, tracks: &TrackSet, speech: &[SpeechWindow]) -> SpeakerTimeline {
        let total = tracks.max_time().unwrap_or(0.0);
        self.attribute_until(tracks, speech, total)
    }

    /// Attribute chunks covering `[0, total]`.
    ///
    /// Chunk rankings are computed in parallel; the hysteresis fold runs in
    /// chunk order.
    pub fn attribute_until(
        &self,
        tracks: &TrackSet,
        speech: &[SpeechWindow],
        total: f64,
    ) -> SpeakerTimeline {
        let bounds = chunk_bounds(total, self.config.chunk_size);
        let last = bounds.len().saturating_sub(1);

        let rankings: Vec<Option<Option<ChunkRanking>>> = bounds
            .par_iter()
            .enumerate()
            .map(|(i, &(start, end))| {
                if !SpeechWindow::any_overlap(speech, &(start, end)) {
                    return None;
                }
                let measures = self.measure(tracks, start, end, i == last);
                Some(ChunkRanking::from_measures(&measures))
            })
            .collect();

        let rule = Hysteresis::from_config(&self.config);
        let mut state = AttributionState::Unattributed;
        let mut chunks = Vec::with_capacity(bounds.len());

        for (&(start, end), ranking) in bounds.iter().zip(rankings) {
            let (track_id, confidence) = match ranking {
                // Outside speech
                None => (None, 0.0),
                // Speech but no track observed: keep the prior attribution
                Some(None) => (state.track_id(), 0.0),
                Some(Some(ranking)) => {
                    state = rule.advance(state, &ranking, start);
                    (state.track_id(), ranking.best_score)
                }
            };
            chunks.push(SpeakerChunk {
                start,
                end,
                track_id,
                confidence,
            });
        }

        let timeline = SpeakerTimeline::new(chunks);
        debug!(
            chunks = timeline.chunks.len(),
            switches = timeline.switch_count(),
            motion_proxy = self.motion.name(),
            "Speaker timeline built"
        );
        timeline
    }
}

fn speaker_score(weights: &SpeakerWeights, motion: f64, presence: f64, jitter: f64) -> f64 {
    weights.motion * motion + weights.presence * presence - weights.jitter * jitter
}

/// Mean Euclidean displacement of the box center between consecutive points.
fn center_jitter(points: &[TrackPoint]) -> f64 {
    let steps: Vec<f64> = points
        .windows(2)
        .map(|pair| {
            let dx = pair[1].bbox.cx() - pair[0].bbox.cx();
            let dy = pair[1].bbox.cy() - pair[0].bbox.cy();
            (dx * dx + dy * dy).sqrt()
        })
        .collect();
    mean(&steps)
}
