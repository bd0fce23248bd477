//! Motion proxies for the "is this face talking" measure.
//!
//! Two strategies share [`MotionProxy`]:
//! - [`BoxAreaVariance`] needs only box statistics
//! - [`MouthRegionMotion`] differences the lower face region of raw frames

use image::GrayImage;
use reclip_models::TrackPoint;

use crate::stats::{mean, safe_ratio, variance};

/// Fraction of the box height, from the top, above the mouth region.
const MOUTH_REGION_TOP: f64 = 0.55;

/// Measures how much a face moves within one chunk.
///
/// `points` are the track's observations inside the chunk, time-ordered.
pub trait MotionProxy: Send + Sync {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    fn motion(&self, points: &[TrackPoint]) -> f64;
}

/// Variance of the box area divided by its mean area.
///
/// Zero for fewer than two observations or when the mean area is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxAreaVariance;

impl MotionProxy for BoxAreaVariance {
    fn name(&self) -> &'static str {
        "box_area_variance"
    }

    fn motion(&self, points: &[TrackPoint]) -> f64 {
        let areas: Vec<f64> = points.iter().map(|p| p.bbox.area()).collect();
        safe_ratio(variance(&areas), mean(&areas))
    }
}

/// Access to decoded grayscale frames by timestamp.
pub trait FrameSource: Send + Sync {
    /// Frame shown at `time`, or `None` when it cannot be produced.
    fn frame_at(&self, time: f64) -> Option<GrayImage>;
}

/// Mean absolute grayscale difference of the mouth region between
/// consecutive observations, normalised to `[0, 1]`.
///
/// Pairs whose frames are unavailable are skipped. When no pair can be
/// measured the box-area proxy is used instead.
pub struct MouthRegionMotion<S> {
    source: S,
    fallback: BoxAreaVariance,
}

impl<S: FrameSource> MouthRegionMotion<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            fallback: BoxAreaVariance,
        }
    }

    fn pair_motion(&self, prev: &TrackPoint, current: &TrackPoint) -> Option<f64> {
        let before = self.source.frame_at(prev.time)?;
        let after = self.source.frame_at(current.time)?;
        region_absdiff(&before, &after, current)
    }
}

impl<S: FrameSource> MotionProxy for MouthRegionMotion<S> {
    fn name(&self) -> &'static str {
        "mouth_region_motion"
    }

    fn motion(&self, points: &[TrackPoint]) -> f64 {
        let measured: Vec<f64> = points
            .windows(2)
            .filter_map(|pair| self.pair_motion(&pair[0], &pair[1]))
            .collect();

        if measured.is_empty() {
            self.fallback.motion(points)
        } else {
            mean(&measured).clamp(0.0, 1.0)
        }
    }
}

/// Mean absolute difference inside the lower face region of `point.bbox`.
fn region_absdiff(before: &GrayImage, after: &GrayImage, point: &TrackPoint) -> Option<f64> {
    if before.dimensions() != after.dimensions() {
        return None;
    }
    let (width, height) = after.dimensions();
    let bbox = point.bbox;

    let x0 = bbox.x1.max(0.0).floor() as u32;
    let x1 = (bbox.x2.ceil().max(0.0) as u32).min(width);
    let y0 = (bbox.y1 + bbox.height() * MOUTH_REGION_TOP).max(0.0).floor() as u32;
    let y1 = (bbox.y2.ceil().max(0.0) as u32).min(height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let mut total: u64 = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            let a = before.get_pixel(x, y).0[0];
            let b = after.get_pixel(x, y).0[0];
            total += u64::from(a.abs_diff(b));
        }
    }
    let count = u64::from(x1 - x0) * u64::from(y1 - y0);
    Some(total as f64 / count as f64 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use reclip_models::BoundingBox;

    fn point(time: f64, bbox: BoundingBox) -> TrackPoint {
        TrackPoint {
            time,
            bbox,
            score: 1.0,
        }
    }

    #[test]
    fn test_area_variance_constant_box_is_still() {
        let b = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let points = [point(0.0, b), point(0.1, b), point(0.2, b)];
        assert_eq!(BoxAreaVariance.motion(&points), 0.0);
    }

    #[test]
    fn test_area_variance_value() {
        // Areas 100 and 144: mean 122, variance 484
        let points = [
            point(0.0, BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            point(0.1, BoundingBox::new(0.0, 0.0, 12.0, 12.0)),
        ];
        let expected = 484.0 / 122.0;
        assert!((BoxAreaVariance.motion(&points) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_area_variance_degenerate_inputs() {
        assert_eq!(BoxAreaVariance.motion(&[]), 0.0);
        let flat = BoundingBox::new(5.0, 5.0, 5.0, 5.0);
        assert_eq!(BoxAreaVariance.motion(&[point(0.0, flat), point(1.0, flat)]), 0.0);
    }

    /// Frames alternate between black and white by timestamp.
    struct Flicker;

    impl FrameSource for Flicker {
        fn frame_at(&self, time: f64) -> Option<GrayImage> {
            let level = if (time * 10.0).round() as i64 % 2 == 0 { 0 } else { 255 };
            Some(GrayImage::from_pixel(20, 20, Luma([level])))
        }
    }

    struct NoFrames;

    impl FrameSource for NoFrames {
        fn frame_at(&self, _time: f64) -> Option<GrayImage> {
            None
        }
    }

    #[test]
    fn test_mouth_motion_full_flicker() {
        let b = BoundingBox::new(2.0, 2.0, 12.0, 12.0);
        let proxy = MouthRegionMotion::new(Flicker);
        let motion = proxy.motion(&[point(0.0, b), point(0.1, b)]);
        assert!((motion - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mouth_motion_falls_back_without_frames() {
        let points = [
            point(0.0, BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            point(0.1, BoundingBox::new(0.0, 0.0, 12.0, 12.0)),
        ];
        let proxy = MouthRegionMotion::new(NoFrames);
        assert_eq!(proxy.motion(&points), BoxAreaVariance.motion(&points));
    }

    #[test]
    fn test_mouth_region_outside_frame_is_skipped() {
        let off = BoundingBox::new(50.0, 50.0, 60.0, 60.0);
        let proxy = MouthRegionMotion::new(Flicker);
        assert_eq!(proxy.motion(&[point(0.0, off), point(0.1, off)]), 0.0);
    }
}
