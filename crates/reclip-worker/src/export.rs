//! Artifact layout and writers.
//!
//! ```text
//! <out>/
//!   manifest.json
//!   analysis/{tracks,speaker_timeline,candidates,export_plan}.json
//!   final/<platform>/meta/clip_NN.json
//!   final/<platform>/crop/clip_NN.json
//!   final/<platform>/captions/clip_NN/captions.{srt,vtt,ass}
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use reclip_models::{Platform, PlannedClip};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WorkerResult;
use crate::metrics::record_artifact_written;

pub const ANALYSIS_DIR: &str = "analysis";
pub const FINAL_DIR: &str = "final";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Paths of every artifact under an output root.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn tracks(&self) -> PathBuf {
        self.root.join(ANALYSIS_DIR).join("tracks.json")
    }

    pub fn speaker_timeline(&self) -> PathBuf {
        self.root.join(ANALYSIS_DIR).join("speaker_timeline.json")
    }

    pub fn candidates(&self) -> PathBuf {
        self.root.join(ANALYSIS_DIR).join("candidates.json")
    }

    pub fn export_plan(&self) -> PathBuf {
        self.root.join(ANALYSIS_DIR).join("export_plan.json")
    }

    fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.root.join(FINAL_DIR).join(platform.as_str())
    }

    pub fn clip_meta(&self, clip: &PlannedClip) -> PathBuf {
        self.platform_dir(clip.platform)
            .join("meta")
            .join(format!("{}.json", clip.file_stem()))
    }

    pub fn clip_crop(&self, clip: &PlannedClip) -> PathBuf {
        self.platform_dir(clip.platform)
            .join("crop")
            .join(format!("{}.json", clip.file_stem()))
    }

    /// Caption file with the given extension (`srt`, `vtt` or `ass`).
    pub fn clip_captions(&self, clip: &PlannedClip, extension: &str) -> PathBuf {
        self.platform_dir(clip.platform)
            .join("captions")
            .join(clip.file_stem())
            .join(format!("captions.{extension}"))
    }
}

/// Summary of one run, written next to the artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub command: String,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub tracks: usize,
    pub speaker_chunks: usize,
    pub candidates: usize,
    /// Zero for `analyze`
    pub clips: usize,
}

/// Write `value` as pretty JSON, creating parent directories.
pub async fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
    kind: &'static str,
) -> WorkerResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_bytes(path, &bytes, kind).await
}

/// Write a text artifact, creating parent directories.
pub async fn write_text(path: &Path, contents: &str, kind: &'static str) -> WorkerResult<()> {
    write_bytes(path, contents.as_bytes(), kind).await
}

async fn write_bytes(path: &Path, bytes: &[u8], kind: &'static str) -> WorkerResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    record_artifact_written(kind);
    Ok(())
}
