// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the sequencer.

use thiserror::Error;

/// Sequencer errors
#[derive(Debug, Error)]
pub enum SequencerError {
    /// Operation not valid in the current state (no pins, pin-count mismatch)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Keyframe index outside the timeline
    #[error("Keyframe index {index} out of range (timeline has {len} keyframes)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Timeline length at the time of the call
        len: usize,
    },

    /// Playback needs at least two keyframes
    #[error("Playback needs at least 2 keyframes, timeline has {count}")]
    InsufficientKeyframes {
        /// Keyframe count at the time of the call
        count: usize,
    },

    /// A playback is already running and the restart policy rejects a new one
    #[error("Playback already in progress")]
    PlaybackInProgress,

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SequencerError {
    /// Shorthand for [`SequencerError::InvalidState`]
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}

/// Result type for sequencer operations
pub type Result<T> = std::result::Result<T, SequencerError>;
