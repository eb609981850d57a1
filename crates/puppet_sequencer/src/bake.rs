// SPDX-License-Identifier: MIT OR Apache-2.0
//! Offline frame baking.
//!
//! Runs a private driver at a fixed frame rate and records every pin position
//! per frame, so an external recorder can encode the animation without
//! depending on wall-clock timing.

use crate::error::{Result, SequencerError};
use crate::keyframe::Position;
use crate::pin::{PinBoard, PinId};
use crate::playback::{PlaybackDriver, PlaybackSink, TickOutcome};
use crate::settings::PuppetSettings;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on frames produced by a single bake
pub const MAX_BAKED_FRAMES: usize = 1_000_000;

/// Pin positions for one output frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedFrame {
    /// Frame number, starting at 0
    pub index: u32,
    /// Presentation time in milliseconds
    pub time_ms: u64,
    /// Positions in pin order
    pub positions: Vec<Position>,
}

/// A baked animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedAnimation {
    /// Frame rate
    pub fps: u32,
    /// Pin order used by every frame
    pub pins: Vec<PinId>,
    /// Frames from the first keyframe to the last
    pub frames: Vec<BakedFrame>,
}

impl BakedAnimation {
    /// Total length
    pub fn duration(&self) -> Duration {
        self.frames
            .last()
            .map_or(Duration::ZERO, |f| Duration::from_millis(f.time_ms))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Default)]
struct FrameCollector {
    positions: Vec<Position>,
}

impl PlaybackSink for FrameCollector {
    fn on_tick(&mut self, _pin_index: usize, _pin: PinId, position: Position) {
        self.positions.push(position);
    }
}

/// Bake the timeline into fixed-rate frames.
///
/// `pins` is only read; positions are written to a scratch copy.
pub fn bake_frames(
    timeline: &Timeline,
    pins: &PinBoard,
    settings: &PuppetSettings,
) -> Result<BakedAnimation> {
    let interval = settings.export.frame_interval();
    if interval.is_zero() {
        return Err(SequencerError::invalid_state(format!(
            "frame rate {} is too high",
            settings.export.fps
        )));
    }

    let mut scratch = pins.clone();
    let mut driver = PlaybackDriver::from_config(&settings.playback);
    let segment_duration = settings.playback.segment_duration();
    driver.play(timeline, &scratch, segment_duration)?;

    let frame_limit = frame_limit(timeline, segment_duration, driver.speed(), interval);
    if frame_limit > MAX_BAKED_FRAMES {
        return Err(SequencerError::invalid_state(format!(
            "animation needs about {frame_limit} frames, limit is {MAX_BAKED_FRAMES}"
        )));
    }

    let mut frames = Vec::new();
    let mut time = Duration::ZERO;
    let mut delta = Duration::ZERO;
    loop {
        let mut collector = FrameCollector::default();
        let outcome = driver.tick(timeline, &mut scratch, delta, &mut collector)?;

        frames.push(BakedFrame {
            index: frames.len() as u32,
            time_ms: time.as_millis() as u64,
            positions: collector.positions,
        });

        if outcome == TickOutcome::Completed {
            break;
        }
        if frames.len() >= frame_limit {
            return Err(SequencerError::invalid_state(format!(
                "playback did not finish within {frame_limit} frames"
            )));
        }
        delta = interval;
        time += interval;
    }

    tracing::info!(
        frames = frames.len(),
        fps = settings.export.fps,
        "Baked animation"
    );

    Ok(BakedAnimation {
        fps: settings.export.fps,
        pins: pins.ids(),
        frames,
    })
}

/// Frames needed to play the whole timeline, with slack for rounding and
/// one boundary tick per segment.
fn frame_limit(
    timeline: &Timeline,
    segment_duration: Duration,
    speed: f32,
    interval: Duration,
) -> usize {
    let segments = timeline.segment_count();
    let total = segments as f64 * segment_duration.as_secs_f64() / f64::from(speed);
    let frames = (total / interval.as_secs_f64()).ceil();
    if !frames.is_finite() || frames >= MAX_BAKED_FRAMES as f64 {
        return usize::MAX;
    }
    frames as usize + segments + 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ease::Ease;

    fn two_keyframes() -> (Timeline, PinBoard) {
        let mut pins = PinBoard::new();
        pins.add_pin(Position::new(0.0, 0.0), None);
        let mut timeline = Timeline::new();
        timeline.append_keyframe(vec![Position::new(0.0, 0.0)]).unwrap();
        timeline.append_keyframe(vec![Position::new(100.0, 0.0)]).unwrap();
        (timeline, pins)
    }

    #[test]
    fn test_bake_frame_count_and_endpoints() {
        let (timeline, pins) = two_keyframes();
        let mut settings = PuppetSettings::default();
        settings.export.fps = 10;

        let baked = bake_frames(&timeline, &pins, &settings).unwrap();

        // Frame 0 at t=0 plus ten 100ms frames.
        assert_eq!(baked.frames.len(), 11);
        assert_eq!(baked.frames[0].positions, vec![Position::new(0.0, 0.0)]);
        assert_eq!(baked.frames[10].positions, vec![Position::new(100.0, 0.0)]);
        assert_eq!(baked.duration(), Duration::from_millis(1000));
    }

    #[test]
    fn test_bake_is_deterministic_and_leaves_pins_alone() {
        let (timeline, pins) = two_keyframes();
        let mut settings = PuppetSettings::default();
        settings.playback.easing = Ease::Linear;

        let first = bake_frames(&timeline, &pins, &settings).unwrap();
        let second = bake_frames(&timeline, &pins, &settings).unwrap();

        assert_eq!(first, second);
        assert_eq!(pins.positions(), vec![Position::new(0.0, 0.0)]);
    }

    #[test]
    fn test_bake_rejects_oversized_animation() {
        let (timeline, pins) = two_keyframes();
        let mut settings = PuppetSettings::default();
        settings.playback.segment_duration_ms = u64::MAX / 4;

        let result = bake_frames(&timeline, &pins, &settings);

        assert!(matches!(result, Err(SequencerError::InvalidState(_))));
    }

    #[test]
    fn test_bake_with_non_finite_speed_finishes() {
        let (timeline, pins) = two_keyframes();
        let mut settings = PuppetSettings::default();
        settings.export.fps = 10;
        settings.playback.speed = f32::NAN;

        let baked = bake_frames(&timeline, &pins, &settings).unwrap();

        assert_eq!(baked.frames.len(), 11);
        assert_eq!(baked.frames[10].positions, vec![Position::new(100.0, 0.0)]);
    }

    #[test]
    fn test_frame_limit_covers_normal_playback() {
        let (timeline, _) = two_keyframes();
        let second = Duration::from_secs(1);
        let interval = Duration::from_millis(100);
        let limit = frame_limit(&timeline, second, 1.0, interval);
        assert!(limit >= 11);
        assert!(frame_limit(&timeline, second, 0.1, interval) > limit);
    }

    #[test]
    fn test_bake_requires_playable_timeline() {
        let mut pins = PinBoard::new();
        pins.add_pin(Position::default(), None);
        let result = bake_frames(&Timeline::new(), &pins, &PuppetSettings::default());
        assert!(matches!(result, Err(SequencerError::InsufficientKeyframes { .. })));
    }
}
