// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the sequencer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A 2-D position in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate (left)
    pub x: f32,
    /// Vertical coordinate (top)
    pub y: f32,
}

impl Position {
    /// Create a position
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Position {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [f32; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

/// A captured snapshot of every pin position, in pin-board order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// One position per pin, indexed like the pin board at capture time
    positions: Vec<Position>,
}

impl Keyframe {
    /// Create a new keyframe
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            id: KeyframeId::new(),
            positions,
        }
    }

    /// Positions in pin order
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Position of the pin at `index`
    pub fn position(&self, index: usize) -> Option<Position> {
        self.positions.get(index).copied()
    }

    /// Number of pins captured in this keyframe
    pub fn pin_count(&self) -> usize {
        self.positions.len()
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats.
    ///
    /// Written as a weighted sum so `t == 0` yields `a` and `t == 1` yields `b` exactly.
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a * (1.0 - t) + b * t
    }

    /// Interpolate a position
    pub fn lerp_position(a: Position, b: Position, t: f32) -> Position {
        Position::new(Self::lerp(a.x, b.x, t), Self::lerp(a.y, b.y, t))
    }
}
