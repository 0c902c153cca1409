//! TOML configuration file parsing

use super::Config;
use crate::config::cli::{Cli, StrategyArg};
use crate::config::cli_convert;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with a base configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Wait probe overrides
    if !matches!(cli.strategy, StrategyArg::All) {
        config.wait.strategy = cli_convert::convert_strategy(cli.strategy);
    }
    if let Some(samples) = cli.samples {
        config.wait.probe.samples = samples;
    }
    if let Some(ref min_wait) = cli.min_wait {
        config.wait.probe.min_ms =
            cli_convert::parse_time_ms(min_wait).context("Invalid minimum wait duration")?;
    }
    if let Some(ref max_wait) = cli.max_wait {
        config.wait.probe.max_ms =
            cli_convert::parse_time_ms(max_wait).context("Invalid maximum wait duration")?;
    }
    if let Some(seed) = cli.seed {
        config.wait.probe.seed = seed;
    }

    // Frame probe overrides
    if let Some(frames) = cli.frames {
        config.frames.frames = frames;
    }
    if let Some(ref window) = cli.window {
        config.frames.window_ms =
            cli_convert::parse_time_ms(window).context("Invalid aggregate window")?;
    }
    if let Some(refresh_hz) = cli.refresh_rate {
        config.display.refresh_hz = refresh_hz;
    }
    if let Some(backend) = cli.sync_backend {
        config.display.backend = cli_convert::convert_backend(backend);
    }

    // Granularity probe overrides
    if let Some(steps) = cli.steps {
        config.granularity.steps = steps;
    }

    // Output overrides
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }

    Ok(config)
}
