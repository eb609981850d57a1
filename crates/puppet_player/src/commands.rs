// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command implementations.

use crate::error::Result;
use puppet_sequencer::{
    bake_frames, ImagePlacement, Keypoint, PinId, PlaybackSink, Position, PuppetSession,
    PuppetSettings, SessionSnapshot, SystemClock, TickOutcome, Ticker,
};
use std::path::Path;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Load settings, falling back to defaults
pub fn load_settings(path: Option<&Path>) -> Result<PuppetSettings> {
    match path {
        Some(path) => Ok(PuppetSettings::load(path)?),
        None => Ok(PuppetSettings::default()),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Read a session snapshot, choosing the format by extension
pub async fn read_session(path: &Path) -> Result<SessionSnapshot> {
    let text = tokio::fs::read_to_string(path).await?;
    let snapshot = if is_json(path) {
        SessionSnapshot::from_json(&text)?
    } else {
        SessionSnapshot::from_ron(&text)?
    };
    tracing::info!(
        path = %path.display(),
        pins = snapshot.pins.len(),
        keyframes = snapshot.timeline.keyframe_count(),
        "Loaded session"
    );
    Ok(snapshot)
}

/// Write a session snapshot, choosing the format by extension
pub async fn write_session(path: &Path, snapshot: &SessionSnapshot) -> Result<()> {
    let text = if is_json(path) {
        snapshot.to_json()?
    } else {
        snapshot.to_ron()?
    };
    tokio::fs::write(path, text).await?;
    tracing::info!(path = %path.display(), "Saved session");
    Ok(())
}

/// Place pins from a keypoints file and save a fresh session
pub async fn place_pins(
    settings: PuppetSettings,
    keypoints: &Path,
    placement: ImagePlacement,
    output: &Path,
) -> Result<()> {
    let text = tokio::fs::read_to_string(keypoints).await?;
    let keypoints: Vec<Keypoint> = serde_json::from_str(&text)?;

    let mut session = PuppetSession::new(settings);
    session.place_pins(&keypoints, placement)?;
    write_session(output, &session.snapshot()).await
}

/// Renderer stand-in that logs playback output
#[derive(Debug, Default)]
pub struct LogSink {
    ticks: u64,
}

impl PlaybackSink for LogSink {
    fn on_tick(&mut self, pin_index: usize, _pin: PinId, position: Position) {
        if pin_index == 0 {
            self.ticks += 1;
        }
        tracing::trace!(pin = pin_index, x = position.x, y = position.y, "Pin moved");
    }

    fn on_segment_advance(&mut self, completed: usize, next: usize) {
        tracing::info!(completed, next, ticks = self.ticks, "Segment finished");
    }

    fn on_complete(&mut self) {
        tracing::info!(ticks = self.ticks, "Animation finished");
    }
}

/// Play a session in real time until it completes or Ctrl-C is pressed
pub async fn play(settings: PuppetSettings, snapshot: SessionSnapshot, fps: u32) -> Result<()> {
    let mut session = PuppetSession::from_snapshot(settings, snapshot);
    session.play()?;

    let mut interval = tokio::time::interval(Duration::from_secs(1) / fps.max(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticker = Ticker::new(SystemClock::new());
    let mut sink = LogSink::default();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let delta = ticker.delta();
                if session.tick(delta, &mut sink)? == TickOutcome::Completed {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                session.stop();
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    for pin in session.pins().pins() {
        tracing::info!(
            label = pin.label.as_deref().unwrap_or("-"),
            x = pin.position.x,
            y = pin.position.y,
            "Final pin position"
        );
    }
    Ok(())
}

/// Bake a session to a frames file
pub async fn bake(settings: PuppetSettings, snapshot: SessionSnapshot, output: &Path) -> Result<()> {
    let baked = bake_frames(&snapshot.timeline, &snapshot.pins, &settings)?;
    tokio::fs::write(output, baked.to_json()?).await?;
    tracing::info!(
        path = %output.display(),
        frames = baked.frames.len(),
        duration_ms = baked.duration().as_millis() as u64,
        "Wrote baked frames"
    );
    Ok(())
}

/// Write default settings
pub fn init_settings(output: &Path) -> Result<()> {
    PuppetSettings::default().save(output)?;
    Ok(())
}
