//! Piecewise-linear time functions and their renderer expressions.

use reclip_models::CropPath;
use serde::{Deserialize, Serialize};

use super::geometry::CropGeometry;

/// `(time, value)` knots interpolated linearly, held flat outside the range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiecewiseLinear {
    knots: Vec<(f64, f64)>,
}

impl PiecewiseLinear {
    /// Knots must be in ascending time order.
    pub fn new(knots: Vec<(f64, f64)>) -> Self {
        Self { knots }
    }

    pub fn knots(&self) -> &[(f64, f64)] {
        &self.knots
    }

    /// Value at `t`. Zero when there are no knots.
    pub fn eval(&self, t: f64) -> f64 {
        let Some(&(first_t, first_v)) = self.knots.first() else {
            return 0.0;
        };
        if t < first_t {
            return first_v;
        }
        for pair in self.knots.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t < t1 && t1 > t0 {
                return v0 + (v1 - v0) * (t - t0) / (t1 - t0);
            }
        }
        self.knots.last().map_or(0.0, |&(_, v)| v)
    }

    /// FFmpeg expression in the variable `t`, e.g.
    /// `if(lt(t,0.000),10.000,if(lt(t,2.000),10.000+(20.000-10.000)*(t-0.000)/2.000,20.000))`.
    pub fn to_ffmpeg(&self) -> String {
        let Some(&(first_t, first_v)) = self.knots.first() else {
            return "0".to_string();
        };
        let last_v = self.knots.last().map_or(first_v, |&(_, v)| v);

        let segments: Vec<((f64, f64), (f64, f64))> = self
            .knots
            .windows(2)
            .filter(|pair| pair[1].0 > pair[0].0)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        let mut expr = format!("{last_v:.3}");
        for &((t0, v0), (t1, v1)) in segments.iter().rev() {
            expr = format!(
                "if(lt(t,{t1:.3}),{v0:.3}+({v1:.3}-{v0:.3})*(t-{t0:.3})/{dt:.3},{expr})",
                dt = t1 - t0
            );
        }
        format!("if(lt(t,{first_t:.3}),{first_v:.3},{expr})")
    }
}

/// Renderer expressions for one clip's crop window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropExpression {
    pub x: String,
    pub y: String,
    pub w: String,
    pub h: String,
}

impl CropExpression {
    /// Build x, y, w and h functions from a smoothed path.
    pub fn from_path(path: &CropPath, geometry: &CropGeometry) -> Self {
        let mut x = Vec::with_capacity(path.len());
        let mut y = Vec::with_capacity(path.len());
        let mut w = Vec::with_capacity(path.len());
        let mut h = Vec::with_capacity(path.len());
        for keyframe in &path.keyframes {
            let rect = geometry.rect(keyframe);
            x.push((keyframe.time, rect.x));
            y.push((keyframe.time, rect.y));
            w.push((keyframe.time, rect.width));
            h.push((keyframe.time, rect.height));
        }
        Self {
            x: PiecewiseLinear::new(x).to_ffmpeg(),
            y: PiecewiseLinear::new(y).to_ffmpeg(),
            w: PiecewiseLinear::new(w).to_ffmpeg(),
            h: PiecewiseLinear::new(h).to_ffmpeg(),
        }
    }

    /// `crop` filter with quoted expressions.
    pub fn filter(&self) -> String {
        format!(
            "crop=w='{}':h='{}':x='{}':y='{}'",
            self.w, self.h, self.x, self.y
        )
    }
}
