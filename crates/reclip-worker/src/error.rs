//! Worker error types.

use std::path::PathBuf;

use reclip_engine::EngineError;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Invalid input {path}: {source}")]
    InvalidInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing input file: {0}")]
    MissingInput(PathBuf),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_input(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::InvalidInput {
            path: path.into(),
            source,
        }
    }

    /// Configuration problems are fatal and should not be retried.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::ConfigLoad(_) | Self::Engine(_)
        )
    }
}
