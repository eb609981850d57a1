// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves applied to segment progress.

use serde::{Deserialize, Serialize};

/// Easing function mapping normalized segment progress to interpolation weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Ease {
    /// Linear interpolation
    Linear,
    /// Quadratic ease-in/out
    #[default]
    InOutQuad,
    /// Cubic ease-in/out
    InOutCubic,
    /// Hermite smoothstep (`3t² - 2t³`)
    SmoothStep,
}

impl Ease {
    /// Apply this easing function to progress `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::InOutQuad => "Ease In/Out (Quad)",
            Self::InOutCubic => "Ease In/Out (Cubic)",
            Self::SmoothStep => "Smoothstep",
        }
    }

    /// All easing curves
    pub fn all() -> &'static [Ease] {
        &[Ease::Linear, Ease::InOutQuad, Ease::InOutCubic, Ease::SmoothStep]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for ease in Ease::all() {
            assert_eq!(ease.apply(0.0), 0.0, "{}", ease.name());
            assert_eq!(ease.apply(1.0), 1.0, "{}", ease.name());
        }
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        for ease in Ease::all() {
            let mut prev = ease.apply(0.0);
            for step in 1..=1000 {
                let v = ease.apply(step as f32 / 1000.0);
                assert!(v >= prev, "{} decreased at step {step}", ease.name());
                prev = v;
            }
        }
    }

    #[test]
    fn test_symmetric_around_midpoint() {
        for ease in [Ease::InOutQuad, Ease::InOutCubic, Ease::SmoothStep] {
            assert!((ease.apply(0.5) - 0.5).abs() < 1e-6);
            for step in 0..=50 {
                let t = step as f32 / 100.0;
                let sum = ease.apply(t) + ease.apply(1.0 - t);
                assert!((sum - 1.0).abs() < 1e-5, "{} asymmetric at {t}", ease.name());
            }
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(Ease::InOutQuad.apply(-0.5), 0.0);
        assert_eq!(Ease::InOutQuad.apply(1.5), 1.0);
    }

    #[test]
    fn test_default_is_quadratic() {
        assert_eq!(Ease::default(), Ease::InOutQuad);
        assert!((Ease::default().apply(0.25) - 0.125).abs() < 1e-6);
    }
}
