//! Tracing setup and structured run logging.

use std::str::FromStr;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Coloured human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Format selected by the `LOG_FORMAT` environment variable.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "reclip=info,reclip_engine=info,reclip_worker=info";

/// `RUST_LOG` when set and valid, otherwise [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber.
pub fn init_tracing(format: LogFormat) {
    let env_filter = env_filter();

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(env_filter)
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_ansi(true)
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false),
                )
                .with(env_filter)
                .init();
        }
    }
}

/// Logger for one CLI run.
///
/// Every line carries the run id and command so a run can be followed
/// through JSON logs.
#[derive(Debug, Clone)]
pub struct StageLogger {
    run_id: Uuid,
    command: String,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl StageLogger {
    pub fn new(command: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            command: command.to_string(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            command = %self.command,
            started_at = %self.started_at.to_rfc3339(),
            "Run started: {}", message
        );
    }

    pub fn log_stage(&self, stage: &str, message: &str) {
        info!(
            run_id = %self.run_id,
            command = %self.command,
            stage = stage,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "{}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            command = %self.command,
            "Run warning: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            command = %self.command,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Run completed: {}", message
        );
    }

    /// Span carrying the run context.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "run",
            run_id = %self.run_id,
            command = %self.command
        )
    }
}
