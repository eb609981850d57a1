// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe timeline.
//!
//! Insertion order is playback order. The timeline only grows; it is cleared
//! as a whole when the editing session resets, so indices held by an
//! in-flight playback stay valid.

use crate::error::{Result, SequencerError};
use crate::keyframe::{Keyframe, KeyframeId, Position};
use serde::{Deserialize, Serialize};

/// Minimum keyframe count for playback
pub const MIN_PLAYABLE_KEYFRAMES: usize = 2;

/// Ordered sequence of keyframes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a keyframe at the end.
    ///
    /// Fails with [`SequencerError::InvalidState`] when `positions` is empty.
    pub fn append_keyframe(&mut self, positions: Vec<Position>) -> Result<KeyframeId> {
        if positions.is_empty() {
            return Err(SequencerError::invalid_state(
                "cannot add a keyframe without pins",
            ));
        }

        let keyframe = Keyframe::new(positions);
        let id = keyframe.id;
        self.keyframes.push(keyframe);
        Ok(id)
    }

    /// Keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Get the keyframe at `index`
    pub fn keyframe_at(&self, index: usize) -> Result<&Keyframe> {
        self.keyframes.get(index).ok_or(SequencerError::IndexOutOfRange {
            index,
            len: self.keyframes.len(),
        })
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Whether the timeline has enough keyframes to play
    pub fn is_playable(&self) -> bool {
        self.keyframes.len() >= MIN_PLAYABLE_KEYFRAMES
    }

    /// Number of segments (consecutive keyframe pairs)
    pub fn segment_count(&self) -> usize {
        self.keyframes.len().saturating_sub(1)
    }

    /// Pin count shared by every keyframe.
    ///
    /// Returns `Ok(None)` for an empty timeline and fails if keyframes were
    /// captured with different pin counts.
    pub fn validate(&self) -> Result<Option<usize>> {
        let Some(first) = self.keyframes.first() else {
            return Ok(None);
        };

        let expected = first.pin_count();
        if let Some((index, kf)) = self
            .keyframes
            .iter()
            .enumerate()
            .find(|(_, kf)| kf.pin_count() != expected)
        {
            return Err(SequencerError::invalid_state(format!(
                "keyframe {index} has {} pins, expected {expected}",
                kf.pin_count()
            )));
        }

        Ok(Some(expected))
    }

    /// Remove all keyframes
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(points: &[(f32, f32)]) -> Vec<Position> {
        points.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn test_append_and_access() {
        let mut timeline = Timeline::new();
        timeline.append_keyframe(frame(&[(0.0, 0.0)])).unwrap();
        timeline.append_keyframe(frame(&[(10.0, 0.0)])).unwrap();

        assert_eq!(timeline.keyframe_count(), 2);
        assert_eq!(timeline.segment_count(), 1);
        assert!(timeline.is_playable());
        assert_eq!(timeline.keyframe_at(1).unwrap().positions(), frame(&[(10.0, 0.0)]).as_slice());
    }

    #[test]
    fn test_empty_append_fails_without_mutation() {
        let mut timeline = Timeline::new();
        timeline.append_keyframe(frame(&[(1.0, 1.0)])).unwrap();

        let result = timeline.append_keyframe(Vec::new());

        assert!(matches!(result, Err(SequencerError::InvalidState(_))));
        assert_eq!(timeline.keyframe_count(), 1);
    }

    #[test]
    fn test_index_out_of_range() {
        let timeline = Timeline::new();
        assert!(matches!(
            timeline.keyframe_at(0),
            Err(SequencerError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_keyframe_at_is_idempotent() {
        let mut timeline = Timeline::new();
        timeline.append_keyframe(frame(&[(1.0, 2.0), (3.0, 4.0)])).unwrap();
        let before = timeline.clone();

        let first = timeline.keyframe_at(0).unwrap().clone();
        let second = timeline.keyframe_at(0).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_validate_detects_pin_count_mismatch() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.validate().unwrap(), None);

        timeline.append_keyframe(frame(&[(0.0, 0.0), (1.0, 1.0)])).unwrap();
        assert_eq!(timeline.validate().unwrap(), Some(2));

        timeline.append_keyframe(frame(&[(0.0, 0.0)])).unwrap();
        assert!(timeline.validate().is_err());
    }

    #[test]
    fn test_clear() {
        let mut timeline = Timeline::new();
        timeline.append_keyframe(frame(&[(0.0, 0.0)])).unwrap();
        timeline.clear();
        assert_eq!(timeline.keyframe_count(), 0);
        assert!(!timeline.is_playable());
    }
}
