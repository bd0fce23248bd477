//! IoU-based tracker with explicit state.
//!
//! The tracker itself only holds its threshold. Running state (active tracks
//! and the id counter) lives in [`TrackerState`], which is passed into and
//! returned from every per-frame step so association can be replayed and
//! tested frame by frame.

use std::collections::BTreeMap;

use reclip_models::{BoundingBox, FaceFrame, Track, TrackId, TrackPoint, TrackSet};
use tracing::debug;

use crate::config::TrackerConfig;

/// Running association state between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    /// Track id -> last matched box, for tracks seen in the previous frame
    active: BTreeMap<TrackId, BoundingBox>,
    /// Next id to allocate; ids are never reused
    next_id: TrackId,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            active: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl TrackerState {
    /// Ids of the tracks still eligible for matching.
    pub fn active_ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.active.keys().copied()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Id the next new track will receive.
    pub fn next_id(&self) -> TrackId {
        self.next_id
    }

    fn allocate(&mut self) -> TrackId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// One detection of a frame bound to a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub track_id: TrackId,
    /// Index of the detection within the frame
    pub detection: usize,
    /// True when this detection started the track
    pub is_new: bool,
}

/// Greedy IoU tracker.
#[derive(Debug, Clone)]
pub struct IouTracker {
    iou_threshold: f64,
}

impl IouTracker {
    pub fn new(iou_threshold: f64) -> Self {
        Self { iou_threshold }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.iou_threshold)
    }

    /// Associate the detections of one frame.
    ///
    /// Pairs are matched globally best-IoU first. Unmatched detections start
    /// new tracks. Unmatched tracks are dropped from the returned state.
    pub fn step(
        &self,
        mut state: TrackerState,
        boxes: &[BoundingBox],
    ) -> (TrackerState, Vec<Assignment>) {
        let mut pairs: Vec<(f64, TrackId, usize)> = Vec::new();
        for (&track_id, last) in &state.active {
            for (det_idx, bbox) in boxes.iter().enumerate() {
                let iou = last.iou(bbox);
                if iou > 0.0 && iou >= self.iou_threshold {
                    pairs.push((iou, track_id, det_idx));
                }
            }
        }
        // Highest IoU first; ties resolved by track id then detection index
        pairs.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });

        let mut track_taken: BTreeMap<TrackId, usize> = BTreeMap::new();
        let mut det_track: Vec<Option<TrackId>> = vec![None; boxes.len()];
        for (_, track_id, det_idx) in pairs {
            if track_taken.contains_key(&track_id) || det_track[det_idx].is_some() {
                continue;
            }
            track_taken.insert(track_id, det_idx);
            det_track[det_idx] = Some(track_id);
        }

        let mut next_active = BTreeMap::new();
        let mut assignments = Vec::with_capacity(boxes.len());
        for (det_idx, bbox) in boxes.iter().enumerate() {
            let (track_id, is_new) = match det_track[det_idx] {
                Some(id) => (id, false),
                None => (state.allocate(), true),
            };
            next_active.insert(track_id, *bbox);
            assignments.push(Assignment {
                track_id,
                detection: det_idx,
                is_new,
            });
        }

        let retired = state.active.len() - track_taken.len();
        if retired > 0 {
            debug!(retired, "Retired unmatched tracks");
        }
        state.active = next_active;
        (state, assignments)
    }

    /// Run association over a whole time-ordered frame sequence.
    pub fn associate(&self, frames: &[FaceFrame]) -> TrackSet {
        let mut tracks: BTreeMap<TrackId, Track> = BTreeMap::new();
        let mut state = TrackerState::default();

        for frame in frames {
            let boxes: Vec<BoundingBox> = frame.boxes.iter().map(|b| b.bbox).collect();
            let (next, assignments) = self.step(state, &boxes);
            state = next;

            for assignment in assignments {
                let detected = frame.boxes[assignment.detection];
                tracks
                    .entry(assignment.track_id)
                    .or_insert_with(|| Track::new(assignment.track_id))
                    .points
                    .push(TrackPoint {
                        time: frame.time,
                        bbox: detected.bbox,
                        score: detected.score,
                    });
            }
        }

        TrackSet { tracks }
    }
}
