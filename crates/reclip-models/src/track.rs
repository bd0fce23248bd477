//! Face tracks produced by track association.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::BoundingBox;

/// Track identifier. Allocated from 1 upward and never reused.
pub type TrackId = u32;

/// One observation of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrackPoint {
    pub time: f64,
    pub bbox: BoundingBox,
    pub score: f64,
}

/// A temporally continuous face identity.
///
/// Points are kept in ascending time order, which is the order frames are
/// fed to the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Track {
    pub id: TrackId,
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            points: Vec::new(),
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time of the last observation.
    pub fn last_time(&self) -> Option<f64> {
        self.points.last().map(|p| p.time)
    }

    /// Observation closest in time to `time`. Earlier point wins ties.
    pub fn nearest(&self, time: f64) -> Option<&TrackPoint> {
        if self.points.is_empty() {
            return None;
        }
        let idx = self.points.partition_point(|p| p.time < time);
        let after = self.points.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.points.get(i));
        match (before, after) {
            (Some(b), Some(a)) => {
                if (time - b.time) <= (a.time - time) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (Some(b), None) => Some(b),
            (None, a) => a,
        }
    }

    /// Observations with `start <= time < end`, or `<= end` when `closed`.
    pub fn points_in(&self, start: f64, end: f64, closed: bool) -> &[TrackPoint] {
        let lo = self.points.partition_point(|p| p.time < start);
        let hi = if closed {
            self.points.partition_point(|p| p.time <= end)
        } else {
            self.points.partition_point(|p| p.time < end)
        };
        if hi <= lo {
            &[]
        } else {
            &self.points[lo..hi]
        }
    }
}

/// All tracks from one association pass, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrackSet {
    pub tracks: BTreeMap<TrackId, Track>,
}

impl TrackSet {
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Latest observation time across every track.
    pub fn max_time(&self) -> Option<f64> {
        self.tracks
            .values()
            .filter_map(Track::last_time)
            .fold(None, |acc, t| Some(acc.map_or(t, |a: f64| a.max(t))))
    }
}
