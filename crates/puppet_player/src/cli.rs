// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Headless player for puppet animation sessions
#[derive(Debug, Parser)]
#[command(name = "puppet_player", version, about)]
pub struct Cli {
    /// Settings file (RON); defaults are used when omitted
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Player commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a session from pose keypoints (JSON array of {name, x, y, score})
    Pins {
        /// Keypoints file
        keypoints: PathBuf,
        /// Image center X on the canvas
        #[arg(long, default_value_t = 100.0)]
        left: f32,
        /// Image center Y on the canvas
        #[arg(long, default_value_t = 100.0)]
        top: f32,
        /// Image width
        #[arg(long)]
        width: f32,
        /// Image height
        #[arg(long)]
        height: f32,
        /// Output session file (.ron or .json)
        #[arg(short, long, default_value = "session.ron")]
        output: PathBuf,
    },
    /// Play a session in real time, logging pin positions
    Play {
        /// Session file (.ron or .json)
        session: PathBuf,
        /// Tick rate
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// Bake a session to fixed-rate frames (JSON)
    Bake {
        /// Session file (.ron or .json)
        session: PathBuf,
        /// Output file
        #[arg(short, long, default_value = "frames.json")]
        output: PathBuf,
    },
    /// Write the default settings file
    InitSettings {
        /// Output file
        #[arg(default_value = puppet_sequencer::SETTINGS_FILE_NAME)]
        output: PathBuf,
    },
}
