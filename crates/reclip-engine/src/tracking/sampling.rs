//! Analysis frame sampling and coordinate normalisation.

use reclip_models::FaceFrame;

/// Keep every n-th source frame so analysis runs near `analysis_fps`.
///
/// Always at least 1. Non-positive or non-finite rates fall back to 1.
pub fn frame_stride(source_fps: f64, analysis_fps: f64) -> usize {
    if !(source_fps > 0.0 && analysis_fps > 0.0) || !source_fps.is_finite() {
        return 1;
    }
    let ratio = (source_fps / analysis_fps).round();
    if ratio.is_finite() && ratio >= 1.0 {
        ratio as usize
    } else {
        1
    }
}

/// Keep frames `0, stride, 2*stride, ...`.
pub fn decimate(frames: Vec<FaceFrame>, stride: usize) -> Vec<FaceFrame> {
    if stride <= 1 {
        return frames;
    }
    frames.into_iter().step_by(stride).collect()
}

/// Convert normalized `[0, 1]` boxes to pixel coordinates in place.
pub fn scale_to_pixels(frames: &mut [FaceFrame], frame_width: u32, frame_height: u32) {
    for frame in frames {
        for scored in &mut frame.boxes {
            scored.bbox = scored.bbox.to_pixels(frame_width, frame_height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclip_models::{BoundingBox, ScoredBox};

    #[test]
    fn test_frame_stride() {
        assert_eq!(frame_stride(30.0, 5.0), 6);
        assert_eq!(frame_stride(29.97, 10.0), 3);
        assert_eq!(frame_stride(24.0, 30.0), 1);
        assert_eq!(frame_stride(0.0, 5.0), 1);
        assert_eq!(frame_stride(30.0, 0.0), 1);
    }

    #[test]
    fn test_decimate_keeps_first_frame() {
        let frames: Vec<FaceFrame> = (0..7).map(|i| FaceFrame::new(i as f64, vec![])).collect();
        let kept = decimate(frames, 3);
        let times: Vec<f64> = kept.iter().map(|f| f.time).collect();
        assert_eq!(times, vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_scale_to_pixels() {
        let mut frames = vec![FaceFrame::new(
            0.0,
            vec![ScoredBox::new(BoundingBox::new(0.5, 0.5, 1.0, 1.0), 0.8)],
        )];
        scale_to_pixels(&mut frames, 100, 50);
        assert_eq!(frames[0].boxes[0].bbox, BoundingBox::new(50.0, 25.0, 100.0, 50.0));
        assert_eq!(frames[0].boxes[0].score, 0.8);
    }
}
