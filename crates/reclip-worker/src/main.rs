//! `reclip` command-line entry point.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use reclip_models::ExportPlan;
use reclip_worker::{init_tracing, metrics, AppConfig, FaceInput, LogFormat, RunSummary};

#[derive(Debug, Parser)]
#[command(name = "reclip", version, about = "Speaker-aware vertical clip planner")]
struct Cli {
    /// Log output format (defaults to LOG_FORMAT or pretty)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Track faces, attribute speakers and generate candidates
    Analyze(RunArgs),
    /// Run every stage and write the export plan, crops and captions
    Plan(RunArgs),
    /// Print JSON schemas for the face input and export plan
    Schema,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(long)]
    config: PathBuf,

    /// Directory holding transcript.json, speech.json and faces.json
    #[arg(long)]
    inputs: PathBuf,

    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// Write Prometheus metrics here after the run
    #[arg(long)]
    metrics_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format.unwrap_or_else(LogFormat::from_env));

    if let Err(e) = run(cli.command).await {
        error!("reclip failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => {
            execute(args, |config, inputs, out| async move {
                reclip_worker::run_analysis(&config, &inputs, &out).await
            })
            .await
        }
        Commands::Plan(args) => {
            execute(args, |config, inputs, out| async move {
                reclip_worker::run_plan(&config, &inputs, &out).await
            })
            .await
        }
        Commands::Schema => print_schemas(),
    }
}

async fn execute<F, Fut>(args: RunArgs, stage: F) -> anyhow::Result<()>
where
    F: FnOnce(AppConfig, PathBuf, PathBuf) -> Fut,
    Fut: std::future::Future<Output = reclip_worker::WorkerResult<RunSummary>>,
{
    let handle = match args.metrics_out {
        Some(_) => Some(metrics::init_metrics().context("Failed to install metrics recorder")?),
        None => None,
    };

    let config = AppConfig::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    info!(config = %args.config.display(), "Configuration loaded");

    let summary = stage(config, args.inputs, args.out.clone())
        .await
        .context("Run failed")?;
    info!(
        tracks = summary.tracks,
        speaker_chunks = summary.speaker_chunks,
        candidates = summary.candidates,
        clips = summary.clips,
        out = %args.out.display(),
        "Artifacts written"
    );

    if let (Some(path), Some(handle)) = (args.metrics_out.as_deref(), handle) {
        write_metrics(path, &handle.render()).await?;
    }
    Ok(())
}

async fn write_metrics(path: &Path, rendered: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, rendered)
        .await
        .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    info!(path = %path.display(), "Metrics written");
    Ok(())
}

fn print_schemas() -> anyhow::Result<()> {
    let schemas = serde_json::json!({
        "faces": schemars::schema_for!(FaceInput),
        "export_plan": schemars::schema_for!(ExportPlan),
    });
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}
