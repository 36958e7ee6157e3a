use clap::Parser;
use std::path::PathBuf;

pub const WINDOW_TITLE: &str = "Sonic Spectrum Visualizer";

/// Logical drawing surface, in pixels.
pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

/// Palette generation: A1 upward, octave by octave, below the ceiling.
pub const ROOT_FREQ: f64 = 55.0;
pub const CEILING: f64 = 1000.0;

/// Root, minor third, perfect fifth.
pub const MINOR_TRIAD: [f64; 3] = [
    1.0,
    1.189_207_115_002_721, // 2^(3/12)
    1.498_307_076_876_681_5, // 2^(7/12)
];

pub const DURATION_SECS: f64 = 150.0;
pub const REQUESTED_SAMPLE_RATE: u32 = 44_100;
pub const BIT_DEPTH: u16 = 16;

/// Fixed visualization bounds for color and vertical placement.
pub const MIN_FREQ: f64 = 20.0;
pub const MAX_FREQ: f64 = 1000.0;

pub const TICK_HZ: u32 = 60;
pub const DECAY_PER_TICK: f64 = 0.98;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sonic-spectrum",
    version,
    about = "Minor-chord additive drone with a frequency-keyed particle field, rendered in the terminal"
)]
pub struct Config {
    /// Output device name substring (case-insensitive). Defaults to the system output.
    #[arg(long)]
    pub device: Option<String>,

    #[arg(long, default_value_t = false)]
    pub list_devices: bool,

    /// Skip audio device setup and playback entirely.
    #[arg(long, default_value_t = false)]
    pub mute: bool,

    /// Seed for particle placement/velocity/radius.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many ticks instead of waiting for a quit key.
    #[arg(long)]
    pub max_ticks: Option<u64>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub hud: bool,
}
