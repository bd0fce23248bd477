//! `analyze` and `plan` runs.
//!
//! Inputs are read asynchronously, the CPU-bound engine runs on the
//! blocking pool, and artifacts are written back asynchronously.

use std::path::Path;

use reclip_engine::scoring::HeuristicFeatureExtractor;
use reclip_engine::{Analysis, ClipCrop, ReframeEngine, RunOutput};
use reclip_models::Transcript;
use serde::Serialize;
use tracing::{info, Instrument};

use crate::config::AppConfig;
use crate::error::WorkerResult;
use crate::export::{write_json, write_text, ArtifactLayout, RunManifest};
use crate::inputs::PipelineInputs;
use crate::logging::StageLogger;
use crate::metrics::record_run;
use crate::subtitles::{build_cues, to_ass, to_srt, to_vtt};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub tracks: usize,
    pub speaker_chunks: usize,
    pub candidates: usize,
    pub clips: usize,
}

/// Track, attribute and generate candidates; write the analysis artifacts.
pub async fn run_analysis(
    config: &AppConfig,
    inputs_dir: &Path,
    out_dir: &Path,
) -> WorkerResult<RunSummary> {
    let logger = StageLogger::new("analyze");
    let span = logger.create_span();
    analyze(config, inputs_dir, out_dir, &logger)
        .instrument(span)
        .await
}

async fn analyze(
    config: &AppConfig,
    inputs_dir: &Path,
    out_dir: &Path,
    logger: &StageLogger,
) -> WorkerResult<RunSummary> {
    logger.log_start(&format!("inputs={}", inputs_dir.display()));
    let inputs = PipelineInputs::load(inputs_dir).await?;
    let engine = build_engine(config, &inputs)?;
    let frames = inputs.analysis_frames(config.analysis.face_analysis_fps);

    logger.log_stage("analysis", "Running analysis stages");
    let analysis = tokio::task::spawn_blocking(move || {
        engine.analyze(&frames, &inputs.speech, &inputs.transcript)
    })
    .await?;

    let layout = ArtifactLayout::new(out_dir);
    write_analysis(&layout, &analysis).await?;

    let summary = RunSummary {
        tracks: analysis.tracks.len(),
        speaker_chunks: analysis.timeline.chunks.len(),
        candidates: analysis.candidates.len(),
        clips: 0,
    };
    write_manifest(&layout, logger, summary).await?;
    record_run(logger.command());
    logger.log_completion(&format!(
        "{} candidates in {}",
        summary.candidates,
        layout.root().display()
    ));
    Ok(summary)
}

/// Run every stage and write the analysis, plan, crop and caption artifacts.
pub async fn run_plan(
    config: &AppConfig,
    inputs_dir: &Path,
    out_dir: &Path,
) -> WorkerResult<RunSummary> {
    let logger = StageLogger::new("plan");
    let span = logger.create_span();
    plan(config, inputs_dir, out_dir, &logger)
        .instrument(span)
        .await
}

async fn plan(
    config: &AppConfig,
    inputs_dir: &Path,
    out_dir: &Path,
    logger: &StageLogger,
) -> WorkerResult<RunSummary> {
    logger.log_start(&format!("inputs={}", inputs_dir.display()));
    let inputs = PipelineInputs::load(inputs_dir).await?;
    let engine = build_engine(config, &inputs)?;
    let frames = inputs.analysis_frames(config.analysis.face_analysis_fps);
    let speech = inputs.speech;
    let transcript = inputs.transcript;

    logger.log_stage("engine", "Running all stages");
    let (output, transcript) = tokio::task::spawn_blocking(move || {
        let output = engine.run(&frames, &speech, &transcript);
        (output, transcript)
    })
    .await?;

    if output.analysis.tracks.is_empty() {
        logger.log_warning("no face tracks; crops are centered");
    }
    if output.plan.total_clips() == 0 {
        logger.log_warning("no clips selected");
    }

    let layout = ArtifactLayout::new(out_dir);
    write_analysis(&layout, &output.analysis).await?;
    write_plan(&layout, &output).await?;
    for crop in &output.crops {
        write_clip(&layout, config, &transcript, crop).await?;
    }

    let summary = RunSummary {
        tracks: output.analysis.tracks.len(),
        speaker_chunks: output.analysis.timeline.chunks.len(),
        candidates: output.analysis.candidates.len(),
        clips: output.plan.total_clips(),
    };
    write_manifest(&layout, logger, summary).await?;
    record_run(logger.command());
    logger.log_completion(&format!(
        "{} clips in {}",
        summary.clips,
        layout.root().display()
    ));
    Ok(summary)
}

fn build_engine(config: &AppConfig, inputs: &PipelineInputs) -> WorkerResult<ReframeEngine> {
    let engine_config = config.engine_config(inputs.faces.width, inputs.faces.height);
    let mut extractor = HeuristicFeatureExtractor::new(&engine_config.scoring);
    if let Some(signal) = inputs.audio_energy.clone() {
        extractor = extractor.with_audio_energy(signal);
    }
    let engine = ReframeEngine::new(engine_config)?.with_feature_extractor(Box::new(extractor));
    Ok(engine)
}

async fn write_analysis(layout: &ArtifactLayout, analysis: &Analysis) -> WorkerResult<()> {
    write_json(&layout.tracks(), &analysis.tracks, "tracks").await?;
    write_json(&layout.speaker_timeline(), &analysis.timeline, "speaker_timeline").await?;
    write_json(&layout.candidates(), &analysis.candidates, "candidates").await?;
    Ok(())
}

async fn write_plan(layout: &ArtifactLayout, output: &RunOutput) -> WorkerResult<()> {
    write_json(&layout.export_plan(), &output.plan, "export_plan").await?;
    for clip in output.plan.clips() {
        write_json(&layout.clip_meta(clip), clip, "clip_meta").await?;
    }
    Ok(())
}

async fn write_clip(
    layout: &ArtifactLayout,
    config: &AppConfig,
    transcript: &Transcript,
    crop: &ClipCrop,
) -> WorkerResult<()> {
    let clip = &crop.clip;
    write_json(&layout.clip_crop(clip), crop, "crop").await?;

    let words = transcript.words_between(clip.start, clip.end);
    let cues = build_cues(&words, clip.start, clip.end, &config.subtitles);
    let template = config.templates.get(clip.platform);
    let keywords = &config.scoring.niches.get(clip.platform).keywords;

    write_text(&layout.clip_captions(clip, "srt"), &to_srt(&cues), "captions").await?;
    write_text(&layout.clip_captions(clip, "vtt"), &to_vtt(&cues), "captions").await?;
    write_text(
        &layout.clip_captions(clip, "ass"),
        &to_ass(&cues, template, keywords, &config.subtitles),
        "captions",
    )
    .await?;

    info!(
        platform = %clip.platform,
        clip_index = clip.clip_index,
        keyframes = crop.path.len(),
        cues = cues.len(),
        "Wrote clip artifacts"
    );
    Ok(())
}

async fn write_manifest(
    layout: &ArtifactLayout,
    logger: &StageLogger,
    summary: RunSummary,
) -> WorkerResult<()> {
    let manifest = RunManifest {
        run_id: logger.run_id(),
        command: logger.command().to_string(),
        started_at: logger.started_at(),
        generated_at: chrono::Utc::now(),
        tracks: summary.tracks,
        speaker_chunks: summary.speaker_chunks,
        candidates: summary.candidates,
        clips: summary.clips,
    };
    write_json(&layout.manifest(), &manifest, "manifest").await
}
