use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Headless output-scheduler simulator
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Project JSON to load - optional, a synthetic demo scene is used otherwise
    #[arg(value_name = "PROJECT")]
    pub project: Option<PathBuf>,

    /// Number of display frames to simulate
    #[arg(short = 'n', long = "ticks", value_name = "N", default_value = "180")]
    pub ticks: u32,

    /// Wall-clock step between frames, milliseconds
    #[arg(long = "step", value_name = "MS", default_value = "16")]
    pub step_ms: u64,

    /// Playback rate applied to the main playhead (0 = paused)
    #[arg(short = 'r', long = "rate", value_name = "X", default_value = "1.0")]
    pub rate: f64,

    /// Simulated preparation latency per comp, milliseconds
    #[arg(long = "prep", value_name = "MS", default_value = "40")]
    pub prep_ms: u64,

    /// Force one un-throttled render pass at this frame (after a simulated scrub)
    #[arg(long = "scrub-at", value_name = "N")]
    pub scrub_at: Option<u32>,

    /// Increase logging verbosity (default: info, -v: debug, -vv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
