//! Axis-aligned bounding boxes.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in corner form `(x1, y1, x2, y2)`.
///
/// On the wire a box is a four-element array, matching what face detectors
/// usually emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    /// Left edge
    pub x1: f64,
    /// Top edge
    pub y1: f64,
    /// Right edge
    pub x2: f64,
    /// Bottom edge
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box width (zero for inverted boxes).
    #[inline]
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }

    /// Box height (zero for inverted boxes).
    #[inline]
    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).max(0.0)
    }

    /// Center x-coordinate.
    #[inline]
    pub fn cx(&self) -> f64 {
        (self.x1 + self.x2) / 2.0
    }

    /// Center y-coordinate.
    #[inline]
    pub fn cy(&self) -> f64 {
        (self.y1 + self.y2) / 2.0
    }

    /// Box area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when the box encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.area() <= 0.0
    }

    /// Intersection over Union with another box.
    ///
    /// Zero when the boxes do not overlap or either has no area.
    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = (x2 - x1) * (y2 - y1);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            (intersection / union).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Scale a normalized box (0.0-1.0) into pixel coordinates.
    pub fn to_pixels(&self, frame_width: u32, frame_height: u32) -> BoundingBox {
        let w = frame_width as f64;
        let h = frame_height as f64;
        BoundingBox::new(self.x1 * w, self.y1 * h, self.x2 * w, self.y2 * h)
    }
}

impl JsonSchema for BoundingBox {
    fn schema_name() -> String {
        "BoundingBox".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <[f64; 4]>::json_schema(gen)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iou_identical() {
        let a = BoundingBox::new(10.0, 10.0, 60.0, 80.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_iou_symmetric_and_bounded() {
        let a = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(50.0, 25.0, 170.0, 140.0);
        let ab = a.iou(&b);
        let ba = b.iou(&a);
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab > 0.0 && ab < 1.0);
    }

    #[test]
    fn test_iou_disjoint_and_degenerate() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);

        let flat = BoundingBox::new(5.0, 5.0, 5.0, 9.0);
        assert_eq!(a.iou(&flat), 0.0);
        assert_eq!(flat.iou(&flat), 0.0);
    }

    #[test]
    fn test_serde_array_form() {
        let b: BoundingBox = serde_json::from_str("[1.0, 2.0, 3.0, 4.0]").unwrap();
        assert_eq!(b, BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(serde_json::to_string(&b).unwrap(), "[1.0,2.0,3.0,4.0]");
    }

    #[test]
    fn test_to_pixels() {
        let b = BoundingBox::new(0.25, 0.5, 0.75, 1.0).to_pixels(1920, 1080);
        assert_eq!(b, BoundingBox::new(480.0, 540.0, 1440.0, 1080.0));
    }
}
