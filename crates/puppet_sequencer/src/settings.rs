// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer settings.
//!
//! Settings are stored as RON. Missing fields fall back to defaults so older
//! files keep loading.

use crate::ease::Ease;
use crate::error::{Result, SequencerError};
use crate::playback::RestartPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "puppet.ron";

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Time to move from one keyframe to the next, in milliseconds
    pub segment_duration_ms: u64,
    /// Easing applied inside each segment
    pub easing: Ease,
    /// Speed multiplier
    pub speed: f32,
    /// Behavior of `play()` while already playing
    pub restart_policy: RestartPolicy,
}

impl PlaybackConfig {
    /// Segment duration as a [`Duration`]
    pub fn segment_duration(&self) -> Duration {
        Duration::from_millis(self.segment_duration_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            segment_duration_ms: 1000,
            easing: Ease::InOutQuad,
            speed: 1.0,
            restart_policy: RestartPolicy::Reject,
        }
    }
}

/// Pin placement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Keypoints must score strictly above this to become pins
    pub min_score: f32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self { min_score: 0.5 }
    }
}

/// Frame export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Frames per second when baking playback
    pub fps: u32,
}

impl ExportConfig {
    /// Time between baked frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

/// All sequencer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuppetSettings {
    /// Format version
    pub version: u32,
    /// Playback settings
    pub playback: PlaybackConfig,
    /// Pin placement settings
    pub pins: PinConfig,
    /// Export settings
    pub export: ExportConfig,
}

impl Default for PuppetSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            playback: PlaybackConfig::default(),
            pins: PinConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl PuppetSettings {
    /// Parse settings from RON
    pub fn from_ron(text: &str) -> Result<Self> {
        let settings: Self = ron::from_str(text)?;
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SequencerError::invalid_state(format!(
                "settings version {} is newer than supported version {SETTINGS_FORMAT_VERSION}",
                settings.version
            )));
        }
        if !settings.playback.speed.is_finite() {
            return Err(SequencerError::invalid_state(format!(
                "playback speed must be a finite number, got {}",
                settings.playback.speed
            )));
        }
        Ok(settings)
    }

    /// Serialize settings to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&text)?;
        tracing::info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!(path = %path.display(), "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PuppetSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.playback.segment_duration(), Duration::from_millis(1000));
        assert_eq!(settings.playback.easing, Ease::InOutQuad);
        assert_eq!(settings.playback.restart_policy, RestartPolicy::Reject);
        assert_eq!(settings.pins.min_score, 0.5);
        assert_eq!(settings.export.fps, 30);
    }

    #[test]
    fn test_serialization() {
        let mut settings = PuppetSettings::default();
        settings.playback.easing = Ease::SmoothStep;
        settings.playback.restart_policy = RestartPolicy::Restart;

        let text = settings.to_ron().unwrap();
        let loaded = PuppetSettings::from_ron(&text).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded = PuppetSettings::from_ron("(playback: (segment_duration_ms: 250))").unwrap();
        assert_eq!(loaded.playback.segment_duration_ms, 250);
        assert_eq!(loaded.playback.speed, 1.0);
        assert_eq!(loaded.export.fps, 30);
    }

    #[test]
    fn test_newer_version_rejected() {
        assert!(PuppetSettings::from_ron("(version: 99)").is_err());
    }

    #[test]
    fn test_non_finite_speed_rejected() {
        assert!(matches!(
            PuppetSettings::from_ron("(playback: (speed: NaN))"),
            Err(SequencerError::InvalidState(_))
        ));
        assert!(PuppetSettings::from_ron("(playback: (speed: inf))").is_err());
    }

    #[test]
    fn test_frame_interval() {
        let export = ExportConfig { fps: 25 };
        assert_eq!(export.frame_interval(), Duration::from_millis(40));
        assert_eq!(ExportConfig { fps: 0 }.frame_interval(), Duration::from_secs(1));
    }
}
