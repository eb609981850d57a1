// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player errors.

use puppet_sequencer::SequencerError;
use thiserror::Error;

/// Errors surfaced by the player commands
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Sequencer rejected an operation
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for player commands
pub type Result<T> = std::result::Result<T, PlayerError>;
