//! CLI to Config conversion utilities

use crate::config::cli;
use crate::video::SyncBackend;
use crate::waitlock::StrategyKind;
use anyhow::{Context, Result};

/// Parse a time string (e.g. "5", "5ms", "1s") to milliseconds
pub fn parse_time_ms(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("ms") {
        (s.trim_end_matches("ms"), 1u64)
    } else if s.ends_with("s") {
        (s.trim_end_matches("s"), 1000)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid time format: {}", s))?;

    Ok(num * multiplier)
}

/// Convert CLI StrategyArg to the wait-lock strategy selection
///
/// `All` maps to None, which the wait probe expands to every strategy.
pub fn convert_strategy(arg: cli::StrategyArg) -> Option<StrategyKind> {
    match arg {
        cli::StrategyArg::Condvar => Some(StrategyKind::Condvar),
        cli::StrategyArg::Channel => Some(StrategyKind::Channel),
        cli::StrategyArg::Park => Some(StrategyKind::Park),
        cli::StrategyArg::All => None,
    }
}

/// Convert CLI BackendArg to the frame-sync backend
pub fn convert_backend(arg: cli::BackendArg) -> SyncBackend {
    match arg {
        cli::BackendArg::Software => SyncBackend::Software,
        cli::BackendArg::Timerfd => SyncBackend::Timerfd,
    }
}
