//! Raw keyframe collection and per-clip path planning.

use reclip_models::{CropKeyframe, CropPath, Platform, PlannedClip, SpeakerTimeline, TrackSet};
use tracing::debug;

use super::geometry::CropGeometry;
use super::smoothing::PathSmoother;
use crate::config::CropConfig;

/// Plans a crop path for each selected clip.
#[derive(Debug, Clone)]
pub struct CropPlanner {
    config: CropConfig,
}

impl CropPlanner {
    pub fn new(config: CropConfig) -> Self {
        Self { config }
    }

    pub fn geometry(&self) -> CropGeometry {
        CropGeometry::from_config(&self.config)
    }

    fn center(&self, time: f64) -> CropKeyframe {
        CropKeyframe::centered(time, self.config.frame_width, self.config.frame_height)
    }

    /// Unsmoothed keyframes for `[start, end]`, in clip-relative time.
    ///
    /// One keyframe per overlapping chunk, placed on the attributed face or
    /// on the frame center when no face is available. Empty when there are
    /// no tracks or no overlapping chunks.
    pub fn raw_keyframes(
        &self,
        tracks: &TrackSet,
        timeline: &SpeakerTimeline,
        start: f64,
        end: f64,
    ) -> Vec<CropKeyframe> {
        if tracks.is_empty() {
            return Vec::new();
        }
        let frame_width = self.config.frame_width as f64;

        let mut keyframes: Vec<CropKeyframe> = timeline
            .overlapping(start, end)
            .map(|chunk| {
                let at = chunk.start.max(start);
                let point = chunk
                    .track_id
                    .and_then(|id| tracks.get(id))
                    .and_then(|track| track.nearest(at));
                match point {
                    Some(point) => {
                        let scale = (point.bbox.width() / frame_width
                            * (1.0 + self.config.safe_margin))
                            .clamp(self.config.min_scale, 1.0);
                        CropKeyframe::new(at - start, point.bbox.cx(), point.bbox.cy(), scale)
                    }
                    None => self.center(at - start),
                }
            })
            .collect();

        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        keyframes
    }

    /// Smoothed path for a clip span, using `platform`'s motion limits.
    pub fn plan_span(
        &self,
        tracks: &TrackSet,
        timeline: &SpeakerTimeline,
        start: f64,
        end: f64,
        platform: Platform,
    ) -> CropPath {
        let duration = (end - start).max(0.0);
        let mut raw = self.raw_keyframes(tracks, timeline, start, end);

        if raw.is_empty() {
            debug!(platform = %platform, start, end, "No speaker data, using static crop");
            return CropPath::new(vec![self.center(0.0), self.center(duration)]);
        }

        if let Some(first) = raw.first().copied() {
            if first.time > 0.0 {
                raw.insert(0, first.at(0.0));
            }
        }
        if let Some(last) = raw.last().copied() {
            if last.time < duration {
                raw.push(last.at(duration));
            }
        }

        let (max_pan_speed, max_zoom_rate) = self.config.motion_limits(platform);
        let smoother = PathSmoother {
            alpha: self.config.smoothing_alpha,
            max_pan_speed,
            max_zoom_rate,
            min_scale: self.config.min_scale,
            frame_width: self.config.frame_width as f64,
            frame_height: self.config.frame_height as f64,
        };
        CropPath::new(smoother.smooth(&raw))
    }

    /// Smoothed path for a selected clip.
    pub fn plan(
        &self,
        tracks: &TrackSet,
        timeline: &SpeakerTimeline,
        clip: &PlannedClip,
    ) -> CropPath {
        self.plan_span(tracks, timeline, clip.start, clip.end, clip.platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclip_models::{BoundingBox, SpeakerChunk, Track, TrackPoint};
    use std::collections::BTreeMap;

    fn planner() -> CropPlanner {
        CropPlanner::new(CropConfig::default())
    }

    fn face_track(id: u32, x: f64, times: &[f64]) -> TrackSet {
        let mut track = Track::new(id);
        for &time in times {
            track.points.push(TrackPoint {
                time,
                bbox: BoundingBox::new(x, 300.0, x + 200.0, 500.0),
                score: 1.0,
            });
        }
        TrackSet {
            tracks: BTreeMap::from([(id, track)]),
        }
    }

    fn timeline(spans: &[(f64, f64, Option<u32>)]) -> SpeakerTimeline {
        SpeakerTimeline::new(
            spans
                .iter()
                .map(|&(start, end, track_id)| SpeakerChunk {
                    start,
                    end,
                    track_id,
                    confidence: 1.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_static_path_without_tracks() {
        let path = planner().plan_span(
            &TrackSet::default(),
            &timeline(&[(0.0, 10.0, Some(1))]),
            2.0,
            7.0,
            Platform::TikTok,
        );
        assert_eq!(
            path.keyframes,
            vec![
                CropKeyframe::new(0.0, 960.0, 540.0, 1.0),
                CropKeyframe::new(5.0, 960.0, 540.0, 1.0)
            ]
        );
    }

    #[test]
    fn test_static_path_without_chunks() {
        let tracks = face_track(1, 100.0, &[0.0, 1.0]);
        let path = planner().plan_span(
            &tracks,
            &SpeakerTimeline::default(),
            0.0,
            3.0,
            Platform::Reels,
        );
        assert_eq!(path.len(), 2);
        assert_eq!(path.keyframes[1].time, 3.0);
    }

    #[test]
    fn test_raw_keyframes_follow_face() {
        let tracks = face_track(1, 1000.0, &[0.0, 0.5, 1.0, 1.5]);
        let tl = timeline(&[(0.0, 0.5, None), (0.5, 1.0, Some(1)), (1.0, 1.5, Some(1))]);
        let raw = planner().raw_keyframes(&tracks, &tl, 0.25, 1.5);

        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0], CropKeyframe::new(0.0, 960.0, 540.0, 1.0));
        assert!((raw[1].time - 0.25).abs() < 1e-12);
        assert_eq!(raw[1].center_x, 1100.0);
        assert_eq!(raw[1].center_y, 400.0);
        // 200 / 1920 * 1.15 is below the minimum scale
        assert_eq!(raw[1].scale, 0.4);
    }

    #[test]
    fn test_path_spans_whole_clip() {
        let tracks = face_track(1, 1000.0, &[1.0, 2.0, 3.0]);
        let tl = timeline(&[(1.0, 2.0, Some(1)), (2.0, 3.0, Some(1))]);
        let path = planner().plan_span(&tracks, &tl, 0.5, 4.0, Platform::Shorts);

        let first = path.keyframes.first().unwrap();
        let last = path.keyframes.last().unwrap();
        assert_eq!(first.time, 0.0);
        assert!((last.time - 3.5).abs() < 1e-12);
        assert!(path.keyframes.windows(2).all(|p| p[0].time <= p[1].time));
    }

    #[test]
    fn test_platform_limits_apply() {
        let tracks = face_track(1, 1700.0, &[0.0, 1.0]);
        let tl = timeline(&[(0.0, 1.0, None), (1.0, 2.0, Some(1))]);
        let config = CropConfig::default();

        for platform in Platform::ALL {
            let path = planner().plan_span(&tracks, &tl, 0.0, 2.0, *platform);
            let (pan, _) = config.motion_limits(*platform);
            for pair in path.keyframes.windows(2) {
                let dt = pair[1].time - pair[0].time;
                let dx = (pair[1].center_x - pair[0].center_x).abs();
                assert!(dx <= pan * 1920.0 * dt + 1e-9);
                assert!(dx <= config.max_pan_speed * 1920.0 * dt + 1e-9);
            }
        }
    }

    #[test]
    fn test_fast_jump_stays_under_configured_pan_speed() {
        let tracks = face_track(1, 1800.0, &[0.5]);
        let tl = timeline(&[(0.0, 0.5, None), (0.5, 1.0, Some(1))]);
        let config = CropConfig::default();
        let path = planner().plan_span(&tracks, &tl, 0.0, 1.0, Platform::TikTok);

        assert!(path.len() >= 2);
        for pair in path.keyframes.windows(2) {
            let dt = pair[1].time - pair[0].time;
            let dx = (pair[1].center_x - pair[0].center_x).abs();
            let dz = (pair[1].scale - pair[0].scale).abs();
            assert!(dx <= config.max_pan_speed * 1920.0 * dt + 1e-9, "dx {dx} over {dt}s");
            assert!(dz <= config.max_zoom_rate * dt + 1e-9, "dz {dz} over {dt}s");
        }
    }
}
