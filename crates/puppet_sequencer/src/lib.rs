// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe timeline and playback driver for puppet animation.
//!
//! This crate provides the animation core of the puppet tool:
//! - Pins placed from pose keypoints or by hand
//! - Keyframes capturing every pin position
//! - An append-only timeline
//! - A tick-driven playback driver with eased interpolation
//! - Offline frame baking for video export
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - A [`PuppetSession`] owning pins, timeline and driver
//! - A per-segment completion barrier, so a segment advances exactly once
//! - Injected time ([`Clock`]) instead of wall-clock callbacks
//!
//! Image segmentation, pose inference, rendering and encoding live outside
//! this crate; the renderer receives positions through [`PlaybackSink`].

pub mod bake;
pub mod barrier;
pub mod clock;
pub mod ease;
pub mod error;
pub mod keyframe;
pub mod pin;
pub mod playback;
pub mod session;
pub mod settings;
pub mod timeline;

pub use bake::{bake_frames, BakedAnimation, BakedFrame, MAX_BAKED_FRAMES};
pub use barrier::SegmentBarrier;
pub use clock::{Clock, ManualClock, SystemClock, Ticker};
pub use ease::Ease;
pub use error::{Result, SequencerError};
pub use keyframe::{Interpolation, Keyframe, KeyframeId, Position};
pub use pin::{ImagePlacement, Keypoint, Pin, PinBoard, PinId};
pub use playback::{
    PlaybackDriver, PlaybackEvent, PlaybackSink, PlaybackState, RestartPolicy, TickOutcome,
};
pub use session::{PuppetSession, SessionSnapshot, SESSION_FORMAT_VERSION};
pub use settings::{
    ExportConfig, PinConfig, PlaybackConfig, PuppetSettings, SETTINGS_FILE_NAME,
    SETTINGS_FORMAT_VERSION,
};
pub use timeline::{Timeline, MIN_PLAYABLE_KEYFRAMES};
