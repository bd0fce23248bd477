//! Crop window geometry for a fixed output aspect.

use reclip_models::CropKeyframe;
use serde::{Deserialize, Serialize};

use crate::config::CropConfig;

/// Pixel rectangle of the crop window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Source frame size and the full-scale crop window inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropGeometry {
    pub frame_width: f64,
    pub frame_height: f64,
    /// Width of the largest output-aspect window that fits the frame
    pub base_width: f64,
    pub base_height: f64,
}

impl CropGeometry {
    /// `aspect` is output width over height.
    pub fn new(frame_width: u32, frame_height: u32, aspect: f64) -> Self {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        let (base_width, base_height) = if aspect > 0.0 && fw / fh > aspect {
            (fh * aspect, fh)
        } else if aspect > 0.0 {
            (fw, fw / aspect)
        } else {
            (fw, fh)
        };
        Self {
            frame_width: fw,
            frame_height: fh,
            base_width,
            base_height,
        }
    }

    pub fn from_config(config: &CropConfig) -> Self {
        Self::new(config.frame_width, config.frame_height, config.output_aspect)
    }

    /// Window for a keyframe, shifted to stay inside the frame.
    pub fn rect(&self, keyframe: &CropKeyframe) -> CropRect {
        let width = self.base_width * keyframe.scale;
        let height = self.base_height * keyframe.scale;
        CropRect {
            x: clamp_origin(keyframe.center_x - width / 2.0, self.frame_width - width),
            y: clamp_origin(keyframe.center_y - height / 2.0, self.frame_height - height),
            width,
            height,
        }
    }
}

fn clamp_origin(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_window_in_landscape_frame() {
        let g = CropGeometry::new(1920, 1080, 9.0 / 16.0);
        assert!((g.base_height - 1080.0).abs() < 1e-9);
        assert!((g.base_width - 607.5).abs() < 1e-9);
    }

    #[test]
    fn test_wide_window_in_portrait_frame() {
        let g = CropGeometry::new(1080, 1920, 16.0 / 9.0);
        assert!((g.base_width - 1080.0).abs() < 1e-9);
        assert!((g.base_height - 607.5).abs() < 1e-9);
    }

    #[test]
    fn test_rect_is_kept_inside_frame() {
        let g = CropGeometry::new(1920, 1080, 9.0 / 16.0);
        let left = g.rect(&CropKeyframe::new(0.0, 10.0, 540.0, 1.0));
        assert_eq!(left.x, 0.0);
        let right = g.rect(&CropKeyframe::new(0.0, 1910.0, 540.0, 0.5));
        assert!((right.x + right.width - 1920.0).abs() < 1e-9);
        assert!(right.y >= 0.0 && right.y + right.height <= 1080.0);
    }
}
