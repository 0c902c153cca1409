//! Timing diagnostics probes
//!
//! Three independent measurement procedures that exercise the runtime
//! timing components and report empirical precision for the machine they
//! run on:
//!
//! - **granularity**: the smallest observable increment of the clock
//! - **frames**: inter-frame interval jitter and missed-frame counts
//! - **wait**: wait-lock accuracy per requested duration
//!
//! Probes hold no state across runs; each collects samples, reduces them
//! through [`crate::stats`], and returns a serializable report rendered by
//! [`crate::output`]. Their statistical methodology is part of the contract
//! the runtime components must satisfy, so the reduction rules (missed-frame
//! threshold, below-resolution outcome, per-bucket bias) live here rather
//! than in the renderers.

pub mod frames;
pub mod granularity;
pub mod wait;

use crate::clock::HiresClock;
use serde::{Deserialize, Serialize};

/// Host context captured alongside every report
///
/// Calibration results are per-machine; the context block makes a saved
/// report attributable to the machine and clock source that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    /// Capture time, RFC 3339 local time
    pub captured_at: String,
    /// Logical CPU count
    pub cpus: usize,
    /// Whether the clock fell back to the coarse monotonic source
    pub coarse_clock: bool,
}

impl HostInfo {
    /// Capture the current host context
    pub fn capture(clock: &HiresClock) -> Self {
        Self {
            captured_at: chrono::Local::now().to_rfc3339(),
            cpus: num_cpus::get(),
            coarse_clock: clock.is_coarse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_info_capture() {
        let clock = HiresClock::new();
        let info = HostInfo::capture(&clock);

        assert!(info.cpus >= 1);
        assert!(!info.captured_at.is_empty());
        assert_eq!(info.coarse_clock, clock.is_coarse());
    }
}
