//! Virtual-camera crop path synthesis.
//!
//! Raw keyframes follow the attributed speaker's face. They are smoothed
//! under pan-speed and zoom-rate limits and exported as piecewise-linear
//! expressions for the renderer.

mod expression;
mod geometry;
mod planner;
mod smoothing;

pub use expression::{CropExpression, PiecewiseLinear};
pub use geometry::{CropGeometry, CropRect};
pub use planner::CropPlanner;
pub use smoothing::PathSmoother;
