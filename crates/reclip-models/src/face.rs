//! Face detector output consumed by track association.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;

/// One detected face box with its detector confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredBox {
    pub bbox: BoundingBox,
    #[serde(default = "default_score")]
    pub score: f64,
}

fn default_score() -> f64 {
    1.0
}

impl ScoredBox {
    pub fn new(bbox: BoundingBox, score: f64) -> Self {
        Self { bbox, score }
    }
}

/// All face boxes found in one sampled frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceFrame {
    /// Frame timestamp in seconds
    pub time: f64,
    #[serde(default)]
    pub boxes: Vec<ScoredBox>,
}

impl FaceFrame {
    pub fn new(time: f64, boxes: Vec<ScoredBox>) -> Self {
        Self { time, boxes }
    }

    /// Drop boxes that enclose no area. Returns how many were removed.
    pub fn retain_valid(&mut self) -> usize {
        let before = self.boxes.len();
        self.boxes.retain(|b| !b.bbox.is_degenerate());
        before - self.boxes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retain_valid_drops_empty_boxes() {
        let mut frame = FaceFrame::new(
            0.0,
            vec![
                ScoredBox::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9),
                ScoredBox::new(BoundingBox::new(5.0, 5.0, 5.0, 20.0), 0.9),
                ScoredBox::new(BoundingBox::new(30.0, 30.0, 20.0, 40.0), 0.9),
            ],
        );
        assert_eq!(frame.retain_valid(), 2);
        assert_eq!(frame.boxes.len(), 1);
    }

    #[test]
    fn test_score_defaults_to_one() {
        let b: ScoredBox = serde_json::from_str(r#"{"bbox": [0, 0, 1, 1]}"#).unwrap();
        assert_eq!(b.score, 1.0);
    }
}
