// SPDX-License-Identifier: MIT OR Apache-2.0
//! Puppet Player - headless playback for puppet animation sessions
//!
//! Loads a session (pins + keyframes) written by the editor or by the `pins`
//! command and either plays it in real time, logging pin positions, or bakes
//! it into fixed-rate frames for an external video encoder.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Cli, Command};
use puppet_sequencer::ImagePlacement;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

async fn run(cli: Cli) -> error::Result<()> {
    let settings = commands::load_settings(cli.settings.as_deref())?;

    match cli.command {
        Command::Pins { keypoints, left, top, width, height, output } => {
            let placement = ImagePlacement { left, top, width, height };
            commands::place_pins(settings, &keypoints, placement, &output).await
        }
        Command::Play { session, fps } => {
            let snapshot = commands::read_session(&session).await?;
            commands::play(settings, snapshot, fps).await
        }
        Command::Bake { session, output } => {
            let snapshot = commands::read_session(&session).await?;
            commands::bake(settings, snapshot, &output).await
        }
        Command::InitSettings { output } => commands::init_settings(&output),
    }
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("puppet_player=info,puppet_sequencer=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting Puppet Player v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
