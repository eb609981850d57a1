// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session.
//!
//! A session owns the live pins, the keyframe timeline and the playback
//! driver for one uploaded image. Uploading a new image or restarting calls
//! [`PuppetSession::reset`].

use crate::error::{Result, SequencerError};
use crate::keyframe::{KeyframeId, Position};
use crate::pin::{ImagePlacement, Keypoint, Pin, PinBoard, PinId};
use crate::playback::{PlaybackDriver, PlaybackSink, PlaybackState, TickOutcome};
use crate::settings::PuppetSettings;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Current session file format version
pub const SESSION_FORMAT_VERSION: u32 = 1;

/// Serializable pins + timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Format version
    pub version: u32,
    /// Pins in board order
    pub pins: PinBoard,
    /// Recorded keyframes
    pub timeline: Timeline,
}

impl SessionSnapshot {
    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Deserialize from RON
    pub fn from_ron(text: &str) -> Result<Self> {
        let snapshot: Self = ron::from_str(text)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(text)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<()> {
        if self.version != SESSION_FORMAT_VERSION {
            return Err(SequencerError::invalid_state(format!(
                "unsupported session version {} (expected {SESSION_FORMAT_VERSION})",
                self.version
            )));
        }
        Ok(())
    }
}

/// Pins, timeline and playback for one image
#[derive(Debug, Clone)]
pub struct PuppetSession {
    settings: PuppetSettings,
    pins: PinBoard,
    timeline: Timeline,
    driver: PlaybackDriver,
}

impl PuppetSession {
    /// Create an empty session
    pub fn new(settings: PuppetSettings) -> Self {
        let driver = PlaybackDriver::from_config(&settings.playback);
        Self {
            settings,
            pins: PinBoard::new(),
            timeline: Timeline::new(),
            driver,
        }
    }

    /// Create a session from a saved snapshot
    pub fn from_snapshot(settings: PuppetSettings, snapshot: SessionSnapshot) -> Self {
        let mut session = Self::new(settings);
        session.pins = snapshot.pins;
        session.timeline = snapshot.timeline;
        session
    }

    /// Snapshot pins and timeline
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SESSION_FORMAT_VERSION,
            pins: self.pins.clone(),
            timeline: self.timeline.clone(),
        }
    }

    /// Place pins from pose keypoints using the configured score threshold
    pub fn place_pins(&mut self, keypoints: &[Keypoint], placement: ImagePlacement) -> Result<usize> {
        self.pins
            .place_from_keypoints(keypoints, placement, self.settings.pins.min_score)
    }

    /// Add a pin by hand
    pub fn add_pin(&mut self, position: Position, label: Option<String>) -> PinId {
        self.pins.add_pin(position, label)
    }

    /// Drag a pin
    pub fn move_pin(&mut self, id: PinId, position: Position) -> Result<()> {
        self.pins.move_pin(id, position)
    }

    /// Remove a pin
    pub fn remove_pin(&mut self, id: PinId) -> Option<Pin> {
        self.pins.remove_pin(id)
    }

    /// Record the current pin positions as a new keyframe
    pub fn capture_keyframe(&mut self) -> Result<KeyframeId> {
        let id = self.timeline.append_keyframe(self.pins.positions())?;
        tracing::info!(
            keyframe = self.timeline.keyframe_count() - 1,
            pins = self.pins.len(),
            "Keyframe captured"
        );
        Ok(id)
    }

    /// Start playback with the configured segment duration
    pub fn play(&mut self) -> Result<()> {
        let duration = self.settings.playback.segment_duration();
        self.play_with_duration(duration)
    }

    /// Start playback with an explicit segment duration
    pub fn play_with_duration(&mut self, segment_duration: Duration) -> Result<()> {
        self.driver.play(&self.timeline, &self.pins, segment_duration)
    }

    /// Advance playback by `delta`
    pub fn tick(&mut self, delta: Duration, sink: &mut impl PlaybackSink) -> Result<TickOutcome> {
        self.driver.tick(&self.timeline, &mut self.pins, delta, sink)
    }

    /// Cancel playback
    pub fn stop(&mut self) -> bool {
        self.driver.stop()
    }

    /// Pause playback
    pub fn pause(&mut self) -> bool {
        self.driver.pause()
    }

    /// Resume playback
    pub fn resume(&mut self) -> bool {
        self.driver.resume()
    }

    /// Drop all pins and keyframes (new image or restart)
    pub fn reset(&mut self) {
        self.driver.stop();
        self.pins.clear();
        self.timeline.clear();
        tracing::info!("Session reset");
    }

    /// Playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.driver.state()
    }

    /// Live pins
    pub fn pins(&self) -> &PinBoard {
        &self.pins
    }

    /// Recorded keyframes
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Session settings
    pub fn settings(&self) -> &PuppetSettings {
        &self.settings
    }

    /// Playback driver
    pub fn driver_mut(&mut self) -> &mut PlaybackDriver {
        &mut self.driver
    }
}

impl Default for PuppetSession {
    fn default() -> Self {
        Self::new(PuppetSettings::default())
    }
}
