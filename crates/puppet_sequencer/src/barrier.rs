// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-segment completion barrier.
//!
//! Every pin reports when it reaches the end of the current segment. The
//! barrier releases once, when the set of arrived pins equals the pin set
//! captured at playback start. Arrival order, duplicates and arrivals tagged
//! with a stale segment do not matter.

use crate::pin::PinId;
use std::collections::HashSet;

/// Completion barrier keyed by segment index
#[derive(Debug, Clone)]
pub struct SegmentBarrier {
    segment: usize,
    expected: HashSet<PinId>,
    arrived: HashSet<PinId>,
    released: bool,
}

impl SegmentBarrier {
    /// Create a barrier for `segment` waiting on `expected` pins
    pub fn new(segment: usize, expected: impl IntoIterator<Item = PinId>) -> Self {
        Self {
            segment,
            expected: expected.into_iter().collect(),
            arrived: HashSet::new(),
            released: false,
        }
    }

    /// Segment this barrier guards
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Record that `pin` finished `segment`.
    ///
    /// Returns `true` exactly once per segment: on the arrival that completes
    /// the set.
    pub fn arrive(&mut self, segment: usize, pin: PinId) -> bool {
        if segment != self.segment || self.released {
            return false;
        }
        if !self.expected.contains(&pin) {
            tracing::warn!(segment, pin = ?pin.0, "Completion from a pin outside the active set");
            return false;
        }

        self.arrived.insert(pin);
        if self.arrived.len() == self.expected.len() {
            self.released = true;
            return true;
        }
        false
    }

    /// Whether every expected pin has arrived
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Number of pins that have arrived
    pub fn arrived_count(&self) -> usize {
        self.arrived.len()
    }

    /// Re-arm the barrier for the next segment with the same pin set
    pub fn reset(&mut self, segment: usize) {
        self.segment = segment;
        self.arrived.clear();
        self.released = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_releases_exactly_once() {
        let pins: Vec<PinId> = (0..16).map(|_| PinId::new()).collect();
        let mut barrier = SegmentBarrier::new(0, pins.iter().copied());

        let mut releases = 0;
        // Reverse order with every pin reporting twice.
        for pin in pins.iter().rev().chain(pins.iter()) {
            if barrier.arrive(0, *pin) {
                releases += 1;
            }
        }

        assert_eq!(releases, 1);
        assert!(barrier.is_released());
    }

    #[test]
    fn test_duplicates_do_not_release_early() {
        let a = PinId::new();
        let b = PinId::new();
        let mut barrier = SegmentBarrier::new(0, [a, b]);

        assert!(!barrier.arrive(0, a));
        assert!(!barrier.arrive(0, a));
        assert_eq!(barrier.arrived_count(), 1);
        assert!(barrier.arrive(0, b));
    }

    #[test]
    fn test_stale_segment_and_unknown_pins_ignored() {
        let a = PinId::new();
        let mut barrier = SegmentBarrier::new(1, [a]);

        assert!(!barrier.arrive(0, a));
        assert!(!barrier.arrive(1, PinId::new()));
        assert!(barrier.arrive(1, a));
    }

    #[test]
    fn test_reset_rearms() {
        let a = PinId::new();
        let mut barrier = SegmentBarrier::new(0, [a]);
        assert!(barrier.arrive(0, a));

        barrier.reset(1);

        assert_eq!(barrier.segment(), 1);
        assert!(!barrier.is_released());
        assert!(barrier.arrive(1, a));
    }
}
