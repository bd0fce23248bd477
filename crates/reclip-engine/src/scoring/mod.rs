//! Per-platform scoring and cross-platform selection.
//!
//! Feature extraction sits behind [`FeatureExtractor`] so alternative
//! heuristics can be swapped in without touching ranking or selection.

mod features;
mod scorer;
mod selection;
mod signals;

pub use features::{normalize_token, FeatureExtractor, HeuristicFeatureExtractor};
pub use scorer::Scorer;
pub use selection::{select, ChosenSet};
pub use signals::{SampledSignal, SignalSample};
