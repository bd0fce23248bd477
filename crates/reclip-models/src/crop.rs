//! Virtual-camera keyframes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Timestamped camera center and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CropKeyframe {
    /// Seconds relative to clip start
    pub time: f64,
    /// Center x in source pixels
    pub center_x: f64,
    /// Center y in source pixels
    pub center_y: f64,
    /// Window scale in `[min_scale, 1.0]`
    pub scale: f64,
}

impl CropKeyframe {
    pub fn new(time: f64, center_x: f64, center_y: f64, scale: f64) -> Self {
        Self {
            time,
            center_x,
            center_y,
            scale,
        }
    }

    /// Full-frame keyframe centered in a `width` x `height` frame.
    pub fn centered(time: f64, width: u32, height: u32) -> Self {
        Self::new(time, width as f64 / 2.0, height as f64 / 2.0, 1.0)
    }

    /// Same camera, different time.
    pub fn at(&self, time: f64) -> Self {
        Self { time, ..*self }
    }
}

/// Smoothed keyframes for one clip, first at 0 and last at the clip duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CropPath {
    pub keyframes: Vec<CropKeyframe>,
}

impl CropPath {
    pub fn new(keyframes: Vec<CropKeyframe>) -> Self {
        Self { keyframes }
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}
