//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::probe::frames::FrameProbeConfig;
use crate::probe::granularity::GranularityConfig;
use crate::probe::wait::WaitProbeConfig;
use crate::video::{DisplayMode, SyncBackend};
use crate::waitlock::StrategyKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete probe-run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub granularity: GranularityConfig,
    #[serde(default)]
    pub frames: FrameProbeConfig,
    #[serde(default)]
    pub wait: WaitConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Wait probe configuration plus strategy selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Strategy to probe; absent means probe all three
    #[serde(default)]
    pub strategy: Option<StrategyKind>,
    #[serde(flatten)]
    pub probe: WaitProbeConfig,
}

impl WaitConfig {
    /// Strategies the wait probe will run, in report order
    pub fn strategies(&self) -> Vec<StrategyKind> {
        match self.strategy {
            Some(kind) => vec![kind],
            None => StrategyKind::all().to_vec(),
        }
    }
}

/// Display configuration for the frame probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Refresh rate in Hz
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: f64,
    /// Horizontal resolution in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Vertical resolution in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Frame synchronization backend
    #[serde(default)]
    pub backend: SyncBackend,
}

fn default_refresh_hz() -> f64 {
    60.0
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

impl DisplayConfig {
    /// The display mode this configuration describes
    pub fn mode(&self) -> DisplayMode {
        DisplayMode {
            refresh_hz: self.refresh_hz,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_hz: default_refresh_hz(),
            width: default_width(),
            height: default_height(),
            backend: SyncBackend::default(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write the full report as JSON to this path
    #[serde(default)]
    pub json_output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.granularity.steps, 10_000);
        assert_eq!(config.frames.frames, 300);
        assert_eq!(config.frames.window_ms, 200);
        assert_eq!(config.wait.probe.samples, 600);
        assert_eq!(config.wait.probe.min_ms, 1);
        assert_eq!(config.wait.probe.max_ms, 120);
        assert_eq!(config.display.refresh_hz, 60.0);
        assert!(config.output.json_output.is_none());
    }

    #[test]
    fn test_wait_strategies_selection() {
        let mut wait = WaitConfig::default();
        assert_eq!(wait.strategies().len(), 3);

        wait.strategy = Some(StrategyKind::Park);
        assert_eq!(wait.strategies(), vec![StrategyKind::Park]);
    }

    #[test]
    fn test_display_config_mode() {
        let display = DisplayConfig {
            refresh_hz: 100.0,
            width: 800,
            height: 600,
            backend: SyncBackend::Software,
        };
        let mode = display.mode();
        assert_eq!(mode.refresh_hz, 100.0);
        assert_eq!(mode.width, 800);
        assert_eq!(mode.height, 600);
    }
}
