//! Configuration validation

use super::{Config, DisplayConfig, WaitConfig};
use crate::probe::frames::FrameProbeConfig;
use crate::probe::granularity::GranularityConfig;
use anyhow::Result;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_granularity(&config.granularity)?;
    validate_frames(&config.frames)?;
    validate_wait(&config.wait)?;
    validate_display(&config.display)?;

    Ok(())
}

/// Validate granularity probe configuration
pub fn validate_granularity(granularity: &GranularityConfig) -> Result<()> {
    if granularity.steps == 0 || granularity.steps > 100_000_000 {
        anyhow::bail!(
            "granularity steps must be between 1 and 100000000, got {}",
            granularity.steps
        );
    }

    Ok(())
}

/// Validate frame probe configuration
pub fn validate_frames(frames: &FrameProbeConfig) -> Result<()> {
    if frames.frames == 0 || frames.frames > 1_000_000 {
        anyhow::bail!(
            "frame count must be between 1 and 1000000, got {}",
            frames.frames
        );
    }

    if frames.window_ms == 0 {
        anyhow::bail!("aggregate window must be at least 1ms");
    }

    Ok(())
}

/// Validate wait probe configuration
pub fn validate_wait(wait: &WaitConfig) -> Result<()> {
    if wait.probe.samples == 0 || wait.probe.samples > 1_000_000 {
        anyhow::bail!(
            "wait samples must be between 1 and 1000000, got {}",
            wait.probe.samples
        );
    }

    if wait.probe.min_ms == 0 {
        anyhow::bail!("minimum wait duration must be at least 1ms");
    }

    if wait.probe.max_ms < wait.probe.min_ms {
        anyhow::bail!(
            "maximum wait duration ({}ms) must not be below minimum ({}ms)",
            wait.probe.max_ms,
            wait.probe.min_ms
        );
    }

    if wait.probe.max_ms > 60_000 {
        anyhow::bail!(
            "maximum wait duration must not exceed 60000ms, got {}ms",
            wait.probe.max_ms
        );
    }

    Ok(())
}

/// Validate display configuration
pub fn validate_display(display: &DisplayConfig) -> Result<()> {
    display
        .mode()
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid display configuration: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_steps_rejected() {
        let mut config = Config::default();
        config.granularity.steps = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_frames_rejected() {
        let mut config = Config::default();
        config.frames.frames = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = Config::default();
        config.frames.window_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_wait_range_rejected_when_inverted() {
        let mut config = Config::default();
        config.wait.probe.min_ms = 50;
        config.wait.probe.max_ms = 10;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_wait_zero_minimum_rejected() {
        let mut config = Config::default();
        config.wait.probe.min_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_excessive_wait_rejected() {
        let mut config = Config::default();
        config.wait.probe.max_ms = 120_000;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_refresh_rejected() {
        let mut config = Config::default();
        config.display.refresh_hz = 0.0;
        assert!(validate_config(&config).is_err());

        config.display.refresh_hz = -60.0;
        assert!(validate_config(&config).is_err());
    }
}
