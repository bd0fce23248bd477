//! End-to-end engine runs over synthetic two-speaker inputs.

use reclip_engine::{DurationRange, EngineConfig, NicheKeywords, ReframeEngine};
use reclip_models::{
    BoundingBox, FaceFrame, Platform, PlatformMap, ScoredBox, SpeechWindow, TimeSpan, Transcript,
    TranscriptSegment,
};

const FPS: f64 = 5.0;
const LENGTH_SECS: f64 = 120.0;

/// Two faces for the whole video. The left face pulses in size during the
/// first half, the right face during the second.
fn faces() -> Vec<FaceFrame> {
    let frames = (LENGTH_SECS * FPS) as usize;
    (0..frames)
        .map(|i| {
            let t = i as f64 / FPS;
            let pulse = if i % 2 == 0 { 0.0 } else { 24.0 };
            let (left_grow, right_grow) = if t < LENGTH_SECS / 2.0 {
                (pulse, 0.0)
            } else {
                (0.0, pulse)
            };
            FaceFrame::new(
                t,
                vec![
                    ScoredBox::new(
                        BoundingBox::new(300.0, 300.0, 540.0 + left_grow, 540.0 + left_grow),
                        0.95,
                    ),
                    ScoredBox::new(
                        BoundingBox::new(1300.0, 320.0, 1540.0 + right_grow, 560.0 + right_grow),
                        0.93,
                    ),
                ],
            )
        })
        .collect()
}

fn transcript() -> Transcript {
    let sentences = [
        "Here is how we grew revenue 300 percent.",
        "It started with one small experiment.",
        "um so like we tried things you know",
        "Then growth came from a single channel.",
        "Follow for the next part of the story.",
    ];
    let segments = (0..24)
        .map(|i| {
            let start = i as f64 * 5.0;
            TranscriptSegment {
                start,
                end: start + 4.5,
                text: sentences[i % sentences.len()].to_string(),
                words: Vec::new(),
            }
        })
        .collect();
    Transcript::new(segments)
}

fn speech() -> Vec<SpeechWindow> {
    (0..24)
        .map(|i| SpeechWindow::new(i as f64 * 5.0, i as f64 * 5.0 + 4.6))
        .collect()
}

fn config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.candidates.durations = PlatformMap::new(
        DurationRange::new(9.0, 30.0),
        DurationRange::new(9.0, 30.0),
        DurationRange::new(14.0, 30.0),
    );
    config.scoring.niches = PlatformMap::uniform(NicheKeywords {
        keywords: vec!["growth".into(), "revenue".into()],
        cta: vec!["follow".into()],
    });
    config
}

#[test]
fn full_run_respects_selection_and_crop_limits() {
    let config = config();
    let engine = ReframeEngine::new(config.clone()).unwrap();
    let out = engine.run(&faces(), &speech(), &transcript());

    assert_eq!(out.analysis.tracks.len(), 2);
    assert!(!out.analysis.candidates.is_empty());
    assert!(out.analysis.candidates.len() <= config.candidates.pool_size);

    // Both faces get attributed at some point
    let attributed: std::collections::BTreeSet<_> = out
        .analysis
        .timeline
        .chunks
        .iter()
        .filter_map(|c| c.track_id)
        .collect();
    assert_eq!(attributed.len(), 2);

    // Overlap guard across every platform
    let clips: Vec<_> = out.plan.clips().collect();
    assert!(!clips.is_empty());
    for (i, a) in clips.iter().enumerate() {
        for b in &clips[i + 1..] {
            assert!(a.overlap_ratio(*b) <= config.selection.overlap_max_ratio);
        }
    }
    for platform in Platform::ALL {
        let list = out.plan.clips_for(*platform);
        assert!(list.len() <= config.selection.clips_per_platform);
        let range = config.candidates.durations.get(*platform);
        for (idx, clip) in list.iter().enumerate() {
            assert_eq!(clip.clip_index, idx + 1);
            assert!(range.contains(clip.duration()));
        }
    }

    // One crop per clip, spanning the clip, within motion limits
    assert_eq!(out.crops.len(), out.plan.total_clips());
    for crop in &out.crops {
        let keyframes = &crop.path.keyframes;
        assert_eq!(keyframes.first().unwrap().time, 0.0);
        assert!((keyframes.last().unwrap().time - crop.clip.duration()).abs() < 1e-9);

        let (pan, zoom) = config.crop.motion_limits(crop.clip.platform);
        for pair in keyframes.windows(2) {
            let dt = pair[1].time - pair[0].time;
            assert!(dt >= 0.0);
            assert!((pair[1].center_x - pair[0].center_x).abs() <= pan * 1920.0 * dt + 1e-9);
            assert!((pair[1].scale - pair[0].scale).abs() <= zoom * dt + 1e-9);
            assert!(pair[1].scale >= config.crop.min_scale && pair[1].scale <= 1.0);
        }
        assert!(crop.filter.starts_with("crop="));
    }
}

#[test]
fn runs_are_deterministic() {
    let engine = ReframeEngine::new(config()).unwrap();
    let a = engine.run(&faces(), &speech(), &transcript());
    let b = engine.run(&faces(), &speech(), &transcript());

    assert_eq!(a.analysis.tracks, b.analysis.tracks);
    assert_eq!(a.analysis.timeline, b.analysis.timeline);
    assert_eq!(a.analysis.candidates, b.analysis.candidates);
    assert_eq!(a.plan, b.plan);
    let paths_a: Vec<_> = a.crops.iter().map(|c| c.path.clone()).collect();
    let paths_b: Vec<_> = b.crops.iter().map(|c| c.path.clone()).collect();
    assert_eq!(paths_a, paths_b);
}

#[test]
fn no_faces_gives_static_crops() {
    let engine = ReframeEngine::new(config()).unwrap();
    let out = engine.run(&[], &speech(), &transcript());

    assert!(out.analysis.tracks.is_empty());
    assert!(out.plan.total_clips() > 0);
    for crop in &out.crops {
        assert_eq!(crop.path.len(), 2);
        assert!(crop
            .path
            .keyframes
            .iter()
            .all(|k| k.center_x == 960.0 && k.center_y == 540.0 && k.scale == 1.0));
    }
}

#[test]
fn no_speech_selects_nothing() {
    let engine = ReframeEngine::new(config()).unwrap();
    let out = engine.run(&faces(), &[], &transcript());

    assert!(out.analysis.candidates.is_empty());
    assert_eq!(out.plan.total_clips(), 0);
    assert!(out
        .analysis
        .timeline
        .chunks
        .iter()
        .all(|c| c.track_id.is_none()));
}
