// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pins and the pin board.
//!
//! Pins are the draggable markers placed on the segmented character. The
//! board keeps them in insertion order; that order is the pin index used by
//! keyframes.

use crate::error::{Result, SequencerError};
use crate::keyframe::Position;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinId(pub Uuid);

impl PinId {
    /// Create a new random pin ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

/// A pin on the character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// Unique pin ID
    pub id: PinId,
    /// Body part label from the pose model, if any
    pub label: Option<String>,
    /// Current position
    pub position: Position,
}

/// A body keypoint reported by a pose-estimation model, in image space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Body part name (nose, `left_elbow`, ...)
    #[serde(default)]
    pub name: Option<String>,
    /// X in image pixels
    pub x: f32,
    /// Y in image pixels
    pub y: f32,
    /// Detection confidence
    #[serde(default)]
    pub score: Option<f32>,
}

/// Where the segmented image sits on the canvas.
///
/// `left`/`top` locate the image center, matching the canvas object origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Center X on the canvas
    pub left: f32,
    /// Center Y on the canvas
    pub top: f32,
    /// Image width
    pub width: f32,
    /// Image height
    pub height: f32,
}

impl ImagePlacement {
    /// Map an image-space keypoint to canvas space
    pub fn to_canvas(&self, x: f32, y: f32) -> Position {
        Position::new(x + self.left - self.width / 2.0, y + self.top - self.height / 2.0)
    }
}

/// Ordered collection of live pins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pin>", into = "Vec<Pin>")]
pub struct PinBoard {
    pins: IndexMap<PinId, Pin>,
}

impl TryFrom<Vec<Pin>> for PinBoard {
    type Error = SequencerError;

    fn try_from(pins: Vec<Pin>) -> Result<Self> {
        let mut board = IndexMap::with_capacity(pins.len());
        for pin in pins {
            let id = pin.id;
            if board.insert(id, pin).is_some() {
                return Err(SequencerError::invalid_state(format!(
                    "duplicate pin id {}",
                    id.0
                )));
            }
        }
        Ok(Self { pins: board })
    }
}

impl From<PinBoard> for Vec<Pin> {
    fn from(board: PinBoard) -> Self {
        board.pins.into_values().collect()
    }
}

impl PinBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pin at a position and return its ID
    pub fn add_pin(&mut self, position: Position, label: Option<String>) -> PinId {
        let id = PinId::new();
        self.pins.insert(id, Pin { id, label, position });
        id
    }

    /// Place pins from pose keypoints.
    ///
    /// Keypoints with a score at or below `min_score` are skipped; keypoints
    /// without a score are kept. Returns the number of pins placed.
    pub fn place_from_keypoints(
        &mut self,
        keypoints: &[Keypoint],
        placement: ImagePlacement,
        min_score: f32,
    ) -> Result<usize> {
        let accepted: Vec<&Keypoint> = keypoints
            .iter()
            .filter(|kp| kp.score.map_or(true, |s| s > min_score))
            .collect();

        if accepted.is_empty() {
            return Err(SequencerError::invalid_state(
                "no reliable body keypoints detected",
            ));
        }

        for kp in &accepted {
            self.add_pin(placement.to_canvas(kp.x, kp.y), kp.name.clone());
        }

        tracing::info!(
            placed = accepted.len(),
            skipped = keypoints.len() - accepted.len(),
            "Placed pins from keypoints"
        );
        Ok(accepted.len())
    }

    /// Move a pin
    pub fn move_pin(&mut self, id: PinId, position: Position) -> Result<()> {
        let pin = self
            .pins
            .get_mut(&id)
            .ok_or_else(|| SequencerError::invalid_state(format!("unknown pin {:?}", id.0)))?;
        pin.position = position;
        Ok(())
    }

    /// Remove a pin, keeping the order of the remaining pins
    pub fn remove_pin(&mut self, id: PinId) -> Option<Pin> {
        self.pins.shift_remove(&id)
    }

    /// Get a pin
    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.get(&id)
    }

    /// Get the pin at an index
    pub fn pin_at(&self, index: usize) -> Option<&Pin> {
        self.pins.get_index(index).map(|(_, pin)| pin)
    }

    /// Index of a pin in board order
    pub fn index_of(&self, id: PinId) -> Option<usize> {
        self.pins.get_index_of(&id)
    }

    /// Get all pins in order
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    /// Pin IDs in order
    pub fn ids(&self) -> Vec<PinId> {
        self.pins.keys().copied().collect()
    }

    /// Current positions in order
    pub fn positions(&self) -> Vec<Position> {
        self.pins.values().map(|p| p.position).collect()
    }

    /// Pin count
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether the board has no pins
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Remove all pins
    pub fn clear(&mut self) {
        self.pins.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kp(x: f32, y: f32, score: Option<f32>) -> Keypoint {
        Keypoint { name: None, x, y, score }
    }

    #[test]
    fn test_duplicate_pin_ids_rejected_on_load() {
        let id = PinId::new();
        let pins = vec![
            Pin { id, label: Some("nose".into()), position: Position::new(1.0, 2.0) },
            Pin { id, label: Some("chin".into()), position: Position::new(3.0, 4.0) },
        ];
        let text = serde_json::to_string(&pins).unwrap();

        assert!(serde_json::from_str::<PinBoard>(&text).is_err());
        assert!(matches!(
            PinBoard::try_from(pins),
            Err(SequencerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_board_serializes_in_pin_order() {
        let mut board = PinBoard::new();
        board.add_pin(Position::new(5.0, 0.0), Some("b".into()));
        board.add_pin(Position::new(1.0, 0.0), Some("a".into()));

        let text = serde_json::to_string(&board).unwrap();
        let loaded: PinBoard = serde_json::from_str(&text).unwrap();

        assert_eq!(loaded, board);
        assert_eq!(loaded.positions(), board.positions());
    }

    #[test]
    fn test_keypoint_placement_offsets_by_image_center() {
        let mut board = PinBoard::new();
        let placement = ImagePlacement { left: 100.0, top: 100.0, width: 400.0, height: 300.0 };

        let placed = board
            .place_from_keypoints(&[kp(200.0, 150.0, Some(0.9))], placement, 0.5)
            .unwrap();

        assert_eq!(placed, 1);
        assert_eq!(board.pin_at(0).unwrap().position, Position::new(100.0, 100.0));
    }

    #[test]
    fn test_low_score_keypoints_skipped() {
        let mut board = PinBoard::new();
        let placement = ImagePlacement { left: 0.0, top: 0.0, width: 0.0, height: 0.0 };
        let keypoints = [kp(1.0, 1.0, Some(0.5)), kp(2.0, 2.0, Some(0.51)), kp(3.0, 3.0, None)];

        let placed = board.place_from_keypoints(&keypoints, placement, 0.5).unwrap();

        assert_eq!(placed, 2);
        assert_eq!(board.positions(), vec![Position::new(2.0, 2.0), Position::new(3.0, 3.0)]);
    }

    #[test]
    fn test_no_reliable_keypoints_fails() {
        let mut board = PinBoard::new();
        let placement = ImagePlacement { left: 0.0, top: 0.0, width: 10.0, height: 10.0 };
        let result = board.place_from_keypoints(&[kp(1.0, 1.0, Some(0.1))], placement, 0.5);

        assert!(matches!(result, Err(SequencerError::InvalidState(_))));
        assert!(board.is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut board = PinBoard::new();
        let a = board.add_pin(Position::new(0.0, 0.0), None);
        let b = board.add_pin(Position::new(1.0, 0.0), None);
        let c = board.add_pin(Position::new(2.0, 0.0), None);

        board.remove_pin(b);

        assert_eq!(board.ids(), vec![a, c]);
        assert_eq!(board.index_of(c), Some(1));
    }

    #[test]
    fn test_move_unknown_pin_fails() {
        let mut board = PinBoard::new();
        assert!(board.move_pin(PinId::new(), Position::default()).is_err());
    }
}
