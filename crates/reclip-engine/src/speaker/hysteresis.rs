//! Hysteresis state machine for attribution switches.
//!
//! # State Machine
//!
//! ```text
//!                  first ranked chunk
//! ┌──────────────┐ ──────────────────▶ ┌───────────────────────────┐
//! │ Unattributed │                     │ AttributedTo { id, since } │
//! └──────────────┘                     └───────────────────────────┘
//!                                         │                    ▲
//!                                         └────────────────────┘
//!              best != id && margin >= threshold && elapsed >= hysteresis
//! ```
//!
//! There is no transition back to `Unattributed`.

use reclip_models::TrackId;

use super::attribution::ChunkRanking;
use crate::config::AttributionConfig;

/// Tolerance for chunk start arithmetic.
const TIME_EPSILON: f64 = 1e-9;

/// Attribution carried across chunks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttributionState {
    /// No chunk has been attributed yet.
    #[default]
    Unattributed,
    /// Attributed to `track_id` since the chunk starting at `since`.
    AttributedTo { track_id: TrackId, since: f64 },
}

impl AttributionState {
    pub fn track_id(&self) -> Option<TrackId> {
        match self {
            AttributionState::Unattributed => None,
            AttributionState::AttributedTo { track_id, .. } => Some(*track_id),
        }
    }
}

/// Switch rule: a new speaker must win by a margin and the previous switch
/// must be old enough.
#[derive(Debug, Clone, Copy)]
pub struct Hysteresis {
    pub hysteresis_secs: f64,
    pub confidence_threshold: f64,
}

impl Hysteresis {
    pub fn from_config(config: &AttributionConfig) -> Self {
        Self {
            hysteresis_secs: config.hysteresis_secs,
            confidence_threshold: config.confidence_threshold,
        }
    }

    /// Apply one speech chunk's ranking.
    pub fn advance(
        &self,
        state: AttributionState,
        ranking: &ChunkRanking,
        chunk_start: f64,
    ) -> AttributionState {
        match state {
            AttributionState::Unattributed => AttributionState::AttributedTo {
                track_id: ranking.best,
                since: chunk_start,
            },
            AttributionState::AttributedTo { track_id, since } => {
                let elapsed = chunk_start - since;
                let switch = ranking.best != track_id
                    && ranking.margin >= self.confidence_threshold
                    && elapsed + TIME_EPSILON >= self.hysteresis_secs;
                if switch {
                    AttributionState::AttributedTo {
                        track_id: ranking.best,
                        since: chunk_start,
                    }
                } else {
                    state
                }
            }
        }
    }
}
