//! Short-horizon face track association.
//!
//! Faces are linked across consecutive sampled frames by greedy IoU matching.
//! A track unmatched in one frame is retired for good; there is no
//! re-identification.

mod iou_tracker;
pub mod sampling;

pub use iou_tracker::{Assignment, IouTracker, TrackerState};
pub use sampling::{decimate, frame_stride, scale_to_pixels};
