//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Probe selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProbeKind {
    /// Clock granularity probe
    Granularity,
    /// Frame duration and jitter probe
    Frames,
    /// Wait accuracy probe
    Wait,
    /// Run all three probes
    All,
}

/// Wait-lock strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Mutex + condition variable with timeout
    Condvar,
    /// Zero-capacity rendezvous channel
    Channel,
    /// Thread parking with nanosecond timeout
    Park,
    /// Probe all three strategies
    All,
}

/// Frame synchronization backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Synthetic display paced off the monotonic clock
    Software,
    /// Kernel periodic timer on CLOCK_MONOTONIC (Linux)
    Timerfd,
}

/// FramePulse - Presentation-timing measurement and calibration tool
#[derive(Parser, Debug)]
#[command(name = "framepulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Probe to run
    #[arg(value_enum, value_name = "PROBE", default_value = "all")]
    pub probe: ProbeKind,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // === Wait Probe Options ===
    /// Wait-lock strategy to probe
    #[arg(long, value_enum, default_value = "all")]
    pub strategy: StrategyArg,

    /// Number of wait requests to issue
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Minimum requested wait duration (e.g. 1ms)
    #[arg(long)]
    pub min_wait: Option<String>,

    /// Maximum requested wait duration (e.g. 120ms)
    #[arg(long)]
    pub max_wait: Option<String>,

    /// RNG seed for the wait-duration draw
    #[arg(long)]
    pub seed: Option<u64>,

    // === Frame Probe Options ===
    /// Number of inter-frame intervals to measure
    #[arg(short = 'f', long)]
    pub frames: Option<usize>,

    /// Aggregate window for frame statistics (e.g. 200ms)
    #[arg(long)]
    pub window: Option<String>,

    /// Display refresh rate in Hz
    #[arg(short = 'r', long)]
    pub refresh_rate: Option<f64>,

    /// Frame synchronization backend
    #[arg(long, value_enum)]
    pub sync_backend: Option<BackendArg>,

    // === Granularity Probe Options ===
    /// Number of clock granularity steps to observe
    #[arg(long)]
    pub steps: Option<usize>,

    // === Output Options ===
    /// Write the full report as JSON to this path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Print extra diagnostic detail
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations before building the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(ref path) = self.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }
        Ok(())
    }
}
