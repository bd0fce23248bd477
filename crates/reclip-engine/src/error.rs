//! Error types for the reframing engine.

use reclip_models::Platform;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running the engine.
///
/// Only configuration problems are errors. Degenerate inputs (no faces,
/// no speech, no candidates) produce empty or fallback outputs instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No scoring weights usable for platform {platform}: {reason}")]
    InvalidWeights { platform: Platform, reason: String },
}

impl EngineError {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a weight table error for one platform.
    pub fn invalid_weights(platform: Platform, reason: impl Into<String>) -> Self {
        Self::InvalidWeights {
            platform,
            reason: reason.into(),
        }
    }
}
