// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback driver.
//!
//! The driver walks consecutive keyframe pairs and, on every tick, writes the
//! interpolated position of each pin to the pin board and the sink. A segment
//! advances only after every pin captured at `play()` has reached the end of
//! it (see [`SegmentBarrier`]).
//!
//! ## State machine
//!
//! `Idle -> Playing(0) -> Playing(1) -> ... -> Playing(N-2) -> Idle`
//!
//! `pause()`/`resume()` move between `Playing(i)` and `Paused(i)`; `stop()`
//! returns to `Idle` from either without firing `on_complete`.

use crate::barrier::SegmentBarrier;
use crate::ease::Ease;
use crate::error::{Result, SequencerError};
use crate::keyframe::{Interpolation, Position};
use crate::pin::{PinBoard, PinId};
use crate::settings::PlaybackConfig;
use crate::timeline::{Timeline, MIN_PLAYABLE_KEYFRAMES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not playing
    #[default]
    Idle,
    /// Interpolating from keyframe `segment` to `segment + 1`
    Playing {
        /// Current segment index
        segment: usize,
    },
    /// Paused mid-segment
    Paused {
        /// Current segment index
        segment: usize,
    },
}

impl PlaybackState {
    /// Playing or paused
    pub fn is_active(&self) -> bool {
        !matches!(self, PlaybackState::Idle)
    }

    /// Playing (not paused)
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing { .. })
    }

    /// Current segment, if any
    pub fn segment(&self) -> Option<usize> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Playing { segment } | PlaybackState::Paused { segment } => Some(*segment),
        }
    }
}

/// What `play()` does when a playback is already running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Fail with [`SequencerError::PlaybackInProgress`]
    #[default]
    Reject,
    /// Cancel the running playback and start over from segment 0
    Restart,
}

/// Receiver for playback output (the renderer)
pub trait PlaybackSink {
    /// Interpolated position of one pin for the current tick
    fn on_tick(&mut self, pin_index: usize, pin: PinId, position: Position);

    /// Every pin finished `completed`; playback continues with `next`
    fn on_segment_advance(&mut self, _completed: usize, _next: usize) {}

    /// The last segment finished
    fn on_complete(&mut self) {}
}

impl PlaybackSink for () {
    fn on_tick(&mut self, _pin_index: usize, _pin: PinId, _position: Position) {}
}

/// Recorded playback output
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A pin position update
    Tick {
        /// Pin index in board order
        pin_index: usize,
        /// Pin ID
        pin: PinId,
        /// Interpolated position
        position: Position,
    },
    /// Segment boundary
    SegmentAdvanced {
        /// Finished segment
        completed: usize,
        /// Segment now playing
        next: usize,
    },
    /// Playback finished
    Completed,
}

impl PlaybackSink for Vec<PlaybackEvent> {
    fn on_tick(&mut self, pin_index: usize, pin: PinId, position: Position) {
        self.push(PlaybackEvent::Tick { pin_index, pin, position });
    }

    fn on_segment_advance(&mut self, completed: usize, next: usize) {
        self.push(PlaybackEvent::SegmentAdvanced { completed, next });
    }

    fn on_complete(&mut self) {
        self.push(PlaybackEvent::Completed);
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing is playing
    Idle,
    /// Playback is paused
    Paused,
    /// Still inside `segment`, `progress` in `[0, 1]`
    Playing {
        /// Current segment
        segment: usize,
        /// Normalized progress before easing
        progress: f32,
    },
    /// Segment finished, `next` starts on the following tick
    Advanced {
        /// Segment now playing
        next: usize,
    },
    /// Last segment finished, driver is idle
    Completed,
}

/// Drives pins through the timeline, one tick at a time
#[derive(Debug, Clone)]
pub struct PlaybackDriver {
    state: PlaybackState,
    easing: Ease,
    speed: f32,
    restart_policy: RestartPolicy,
    segment_duration: Duration,
    elapsed: Duration,
    active_pins: Vec<PinId>,
    barrier: SegmentBarrier,
}

impl PlaybackDriver {
    /// Minimum speed multiplier
    pub const MIN_SPEED: f32 = 0.1;
    /// Maximum speed multiplier
    pub const MAX_SPEED: f32 = 10.0;

    /// Create a driver with default settings
    pub fn new() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }

    /// Create a driver from playback settings
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            state: PlaybackState::Idle,
            easing: config.easing,
            speed: Self::clamp_speed(config.speed),
            restart_policy: config.restart_policy,
            segment_duration: config.segment_duration(),
            elapsed: Duration::ZERO,
            active_pins: Vec::new(),
            barrier: SegmentBarrier::new(0, Vec::new()),
        }
    }

    /// Start playback from the first keyframe.
    ///
    /// Nothing changes when this fails: a running playback keeps running.
    pub fn play(
        &mut self,
        timeline: &Timeline,
        pins: &PinBoard,
        segment_duration: Duration,
    ) -> Result<()> {
        if self.state.is_active() {
            match self.restart_policy {
                RestartPolicy::Reject => {
                    tracing::warn!("Play requested while playback is running");
                    return Err(SequencerError::PlaybackInProgress);
                }
                RestartPolicy::Restart => {
                    tracing::info!("Restarting playback");
                }
            }
        }

        let count = timeline.keyframe_count();
        if count < MIN_PLAYABLE_KEYFRAMES {
            tracing::warn!(count, "Not enough keyframes to play");
            return Err(SequencerError::InsufficientKeyframes { count });
        }

        let pin_count = timeline.validate()?.unwrap_or(0);
        if pin_count != pins.len() {
            return Err(SequencerError::invalid_state(format!(
                "keyframes hold {pin_count} pins but {} pins are live",
                pins.len()
            )));
        }

        self.active_pins = pins.ids();
        self.barrier = SegmentBarrier::new(0, self.active_pins.iter().copied());
        self.segment_duration = segment_duration;
        self.elapsed = Duration::ZERO;
        self.state = PlaybackState::Playing { segment: 0 };

        tracing::info!(
            keyframes = count,
            pins = pin_count,
            segment_ms = segment_duration.as_millis() as u64,
            "Playback started"
        );
        Ok(())
    }

    /// Advance playback by `delta` and emit positions for every pin.
    ///
    /// Fails with [`SequencerError::InvalidState`] if the pin set or the
    /// timeline no longer matches what playback started with; the driver is
    /// idle afterwards.
    pub fn tick(
        &mut self,
        timeline: &Timeline,
        pins: &mut PinBoard,
        delta: Duration,
        sink: &mut impl PlaybackSink,
    ) -> Result<TickOutcome> {
        let segment = match self.state {
            PlaybackState::Idle => return Ok(TickOutcome::Idle),
            PlaybackState::Paused { .. } => return Ok(TickOutcome::Paused),
            PlaybackState::Playing { segment } => segment,
        };

        if let Err(err) = self.check_consistency(timeline, pins, segment) {
            tracing::warn!(segment, error = %err, "Playback aborted");
            self.halt();
            return Err(err);
        }

        self.elapsed += self.scaled(delta);
        let progress = self.progress();
        let weight = self.easing.apply(progress);

        let from = timeline.keyframe_at(segment)?.positions();
        let to = timeline.keyframe_at(segment + 1)?.positions();

        let mut released = false;
        for (index, ((&pin, &a), &b)) in self.active_pins.iter().zip(from).zip(to).enumerate() {
            let position = Interpolation::lerp_position(a, b, weight);
            pins.move_pin(pin, position)?;
            sink.on_tick(index, pin, position);

            if progress >= 1.0 && self.barrier.arrive(segment, pin) {
                released = true;
            }
        }

        if !released {
            return Ok(TickOutcome::Playing { segment, progress });
        }

        self.elapsed = self.elapsed.saturating_sub(self.segment_duration);
        let next = segment + 1;
        if next < timeline.segment_count() {
            self.state = PlaybackState::Playing { segment: next };
            self.barrier.reset(next);
            tracing::debug!(completed = segment, next, "Segment advanced");
            sink.on_segment_advance(segment, next);
            Ok(TickOutcome::Advanced { next })
        } else {
            self.halt();
            tracing::info!(segments = next, "Playback complete");
            sink.on_complete();
            Ok(TickOutcome::Completed)
        }
    }

    fn check_consistency(&self, timeline: &Timeline, pins: &PinBoard, segment: usize) -> Result<()> {
        if pins.len() != self.active_pins.len()
            || self.active_pins.iter().any(|id| pins.pin(*id).is_none())
        {
            return Err(SequencerError::invalid_state(format!(
                "pin set changed during playback ({} live, {} expected)",
                pins.len(),
                self.active_pins.len()
            )));
        }

        if segment + 1 >= timeline.keyframe_count() {
            return Err(SequencerError::invalid_state(format!(
                "timeline shrank to {} keyframes during playback",
                timeline.keyframe_count()
            )));
        }

        for index in [segment, segment + 1] {
            let count = timeline.keyframe_at(index)?.pin_count();
            if count != self.active_pins.len() {
                return Err(SequencerError::invalid_state(format!(
                    "keyframe {index} holds {count} pins, expected {}",
                    self.active_pins.len()
                )));
            }
        }
        Ok(())
    }

    fn scaled(&self, delta: Duration) -> Duration {
        if self.speed == 1.0 {
            return delta;
        }
        Duration::from_nanos((delta.as_nanos() as f64 * f64::from(self.speed)).round() as u64)
    }

    fn halt(&mut self) {
        self.state = PlaybackState::Idle;
        self.elapsed = Duration::ZERO;
        self.active_pins.clear();
    }

    /// Cancel playback. Returns `false` if nothing was playing.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.halt();
        tracing::info!("Playback stopped");
        true
    }

    /// Pause playback
    pub fn pause(&mut self) -> bool {
        if let PlaybackState::Playing { segment } = self.state {
            self.state = PlaybackState::Paused { segment };
            tracing::info!(segment, "Playback paused");
            true
        } else {
            false
        }
    }

    /// Resume paused playback
    pub fn resume(&mut self) -> bool {
        if let PlaybackState::Paused { segment } = self.state {
            self.state = PlaybackState::Playing { segment };
            tracing::info!(segment, "Playback resumed");
            true
        } else {
            false
        }
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Normalized progress through the current segment, before easing
    pub fn progress(&self) -> f32 {
        if self.segment_duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.segment_duration.as_secs_f32()).min(1.0)
    }

    /// Easing curve
    pub fn easing(&self) -> Ease {
        self.easing
    }

    /// Set the easing curve
    pub fn set_easing(&mut self, easing: Ease) {
        self.easing = easing;
    }

    /// Speed multiplier
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set speed (clamped to a reasonable range, non-finite values reset to 1.0)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = Self::clamp_speed(speed);
    }

    fn clamp_speed(speed: f32) -> f32 {
        if !speed.is_finite() {
            tracing::warn!(speed, "Ignoring non-finite playback speed");
            return 1.0;
        }
        speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED)
    }

    /// Restart policy
    pub fn restart_policy(&self) -> RestartPolicy {
        self.restart_policy
    }

    /// Set the restart policy
    pub fn set_restart_policy(&mut self, policy: RestartPolicy) {
        self.restart_policy = policy;
    }
}

impl Default for PlaybackDriver {
    fn default() -> Self {
        Self::new()
    }
}
