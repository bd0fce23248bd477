//! Voice activity windows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::span::TimeSpan;

/// A stretch of detected speech. Windows are time-ordered and disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechWindow {
    pub start: f64,
    pub end: f64,
}

impl SpeechWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// True if any window shares a positive-length interval with the span.
    pub fn any_overlap<S: TimeSpan + ?Sized>(windows: &[SpeechWindow], span: &S) -> bool {
        windows.iter().any(|w| w.overlaps(span))
    }
}

impl TimeSpan for SpeechWindow {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}
