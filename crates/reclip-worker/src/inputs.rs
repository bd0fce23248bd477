//! Loading pre-computed inputs from a directory.
//!
//! Expected files:
//! - `transcript.json`: `{ "segments": [...] }`
//! - `speech.json`: `[{ "start": .., "end": .. }, ...]`
//! - `faces.json`: frame size, optional source fps and the per-frame boxes
//! - `audio_energy.json` (optional): `{ "samples": [{ "time": .., "value": .. }] }`

use std::path::{Path, PathBuf};

use reclip_engine::scoring::SampledSignal;
use reclip_engine::tracking::{decimate, frame_stride, scale_to_pixels};
use reclip_models::{FaceFrame, SpeechWindow, Transcript};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{WorkerError, WorkerResult};

pub const TRANSCRIPT_FILE: &str = "transcript.json";
pub const SPEECH_FILE: &str = "speech.json";
pub const FACES_FILE: &str = "faces.json";
pub const AUDIO_ENERGY_FILE: &str = "audio_energy.json";

/// Face detector output for a whole video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FaceInput {
    /// Source frame width in pixels
    pub width: u32,
    /// Source frame height in pixels
    pub height: u32,
    /// Rate the frames were sampled at; enables decimation when set
    #[serde(default)]
    pub fps: Option<f64>,
    /// Boxes are in `[0, 1]` coordinates rather than pixels
    #[serde(default)]
    pub normalized: bool,
    #[serde(default)]
    pub frames: Vec<FaceFrame>,
}

/// Everything the engine consumes for one video.
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub transcript: Transcript,
    pub speech: Vec<SpeechWindow>,
    pub faces: FaceInput,
    pub audio_energy: Option<SampledSignal>,
}

impl PipelineInputs {
    /// Load every input file from `dir`.
    pub async fn load(dir: &Path) -> WorkerResult<Self> {
        let transcript: Transcript = read_json(&dir.join(TRANSCRIPT_FILE)).await?;
        let speech: Vec<SpeechWindow> = read_json(&dir.join(SPEECH_FILE)).await?;
        let faces: FaceInput = read_json(&dir.join(FACES_FILE)).await?;

        let audio_path = dir.join(AUDIO_ENERGY_FILE);
        let audio_energy = if tokio::fs::try_exists(&audio_path).await? {
            Some(read_json(&audio_path).await?)
        } else {
            None
        };

        if faces.width == 0 || faces.height == 0 {
            return Err(WorkerError::config_error(format!(
                "{FACES_FILE} must declare a non-zero frame size"
            )));
        }

        debug!(
            segments = transcript.segments.len(),
            speech_windows = speech.len(),
            face_frames = faces.frames.len(),
            audio_energy = audio_energy.is_some(),
            "Loaded inputs"
        );

        Ok(Self {
            transcript,
            speech: sanitize_speech(speech),
            faces,
            audio_energy,
        })
    }

    /// Face frames in pixel coordinates, time-ordered and decimated to the
    /// analysis rate. Boxes with no area are dropped.
    pub fn analysis_frames(&self, analysis_fps: f64) -> Vec<FaceFrame> {
        let mut frames = self.faces.frames.clone();
        frames.sort_by(|a, b| a.time.total_cmp(&b.time));
        if self.faces.normalized {
            scale_to_pixels(&mut frames, self.faces.width, self.faces.height);
        }
        let dropped: usize = frames.iter_mut().map(FaceFrame::retain_valid).sum();
        if dropped > 0 {
            warn!(dropped, "Ignored face boxes with no area");
        }
        let stride = self
            .faces
            .fps
            .map_or(1, |fps| frame_stride(fps, analysis_fps));
        debug!(stride, frames = frames.len(), "Sampling face frames");
        decimate(frames, stride)
    }
}

/// Drop empty windows and order the rest by start time.
fn sanitize_speech(mut windows: Vec<SpeechWindow>) -> Vec<SpeechWindow> {
    let before = windows.len();
    windows.retain(|w| w.end > w.start);
    if windows.len() < before {
        warn!(dropped = before - windows.len(), "Ignored empty speech windows");
    }
    windows.sort_by(|a, b| a.start.total_cmp(&b.start));
    windows
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> WorkerResult<T> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(WorkerError::MissingInput(PathBuf::from(path)));
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_slice(&bytes).map_err(|e| WorkerError::invalid_input(path, e))
}
