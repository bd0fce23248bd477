//! Damped, speed-limited keyframe smoothing.

use reclip_models::CropKeyframe;

/// Smooths raw keyframes toward their targets under motion limits.
///
/// Each step starts from the previous smoothed keyframe, moves `alpha` of the
/// way toward the next raw keyframe, then clamps the move to
/// `max_pan_speed * dimension * dt` for the center and `max_zoom_rate * dt`
/// for the scale.
#[derive(Debug, Clone, Copy)]
pub struct PathSmoother {
    pub alpha: f64,
    /// Frame dimensions per second
    pub max_pan_speed: f64,
    /// Scale units per second
    pub max_zoom_rate: f64,
    pub min_scale: f64,
    pub frame_width: f64,
    pub frame_height: f64,
}

impl PathSmoother {
    pub fn smooth(&self, raw: &[CropKeyframe]) -> Vec<CropKeyframe> {
        let mut smoothed: Vec<CropKeyframe> = Vec::with_capacity(raw.len());
        let Some(first) = raw.first() else {
            return smoothed;
        };
        smoothed.push(CropKeyframe {
            scale: first.scale.clamp(self.min_scale, 1.0),
            ..*first
        });

        for target in &raw[1..] {
            let prev = smoothed[smoothed.len() - 1];
            let dt = (target.time - prev.time).max(0.0);

            let max_dx = self.max_pan_speed * self.frame_width * dt;
            let max_dy = self.max_pan_speed * self.frame_height * dt;
            let max_ds = self.max_zoom_rate * dt;

            let dx = (self.alpha * (target.center_x - prev.center_x)).clamp(-max_dx, max_dx);
            let dy = (self.alpha * (target.center_y - prev.center_y)).clamp(-max_dy, max_dy);
            let ds = (self.alpha * (target.scale - prev.scale)).clamp(-max_ds, max_ds);

            smoothed.push(CropKeyframe::new(
                target.time,
                prev.center_x + dx,
                prev.center_y + dy,
                (prev.scale + ds).clamp(self.min_scale, 1.0),
            ));
        }

        smoothed
    }
}
