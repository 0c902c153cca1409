//! Clock granularity probe
//!
//! Reads the clock in a tight loop, counting how many reads occur before
//! the returned value changes and recording the magnitude of each change.
//! The mean change magnitude is the empirical granularity; the mean read
//! count per change says how far below the call overhead that granularity
//! sits.
//!
//! If every single read changes the value, the true granularity cannot be
//! resolved by this method: the clock ticks faster than it can be polled.
//! That outcome is reported explicitly as below measurement resolution —
//! it is a valid measurement result, not a failure.

use crate::clock::{HiresClock, TimePoint};
use crate::stats::DurationSummary;
use serde::{Deserialize, Serialize};

/// Granularity probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GranularityConfig {
    /// Number of value changes (granularity steps) to observe
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_steps() -> usize {
    10_000
}

impl Default for GranularityConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

/// Outcome of the granularity measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GranularityResolution {
    /// The clock was observed holding values between changes
    Measured {
        /// Mean inter-change delta in nanoseconds
        mean_step_nanos: f64,
    },
    /// Every read changed the value; the clock outruns the polling loop
    BelowMeasurement,
}

/// Granularity probe report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GranularityReport {
    /// Number of value changes observed
    pub steps_observed: u64,
    /// Total clock reads issued
    pub total_reads: u64,
    /// Mean reads per observed change (1.0 means every read changed)
    pub mean_reads_per_step: f64,
    /// The measured granularity, or the below-resolution outcome
    pub resolution: GranularityResolution,
    /// Distribution of inter-change deltas
    pub step_summary: DurationSummary,
}

/// Run the granularity probe against the clock
pub fn run(clock: &HiresClock, config: &GranularityConfig) -> GranularityReport {
    measure(|| clock.now(), config)
}

/// Probe an arbitrary time source
///
/// Split out from [`run`] so the reduction rules can be exercised against a
/// deterministic source.
fn measure(mut read: impl FnMut() -> TimePoint, config: &GranularityConfig) -> GranularityReport {
    let steps = config.steps.max(1);

    let mut step_summary = DurationSummary::new();
    let mut total_reads: u64 = 0;
    let mut every_read_changed = true;

    let mut last = read();
    for _ in 0..steps {
        let mut reads_this_step: u64 = 0;
        loop {
            let now = read();
            reads_this_step += 1;
            if now > last {
                step_summary.record_nanos(now.nanos_since(last));
                last = now;
                break;
            }
        }
        total_reads += reads_this_step;
        if reads_this_step > 1 {
            every_read_changed = false;
        }
    }

    let mean_reads_per_step = total_reads as f64 / steps as f64;

    let resolution = if every_read_changed {
        GranularityResolution::BelowMeasurement
    } else {
        GranularityResolution::Measured {
            mean_step_nanos: step_summary.mean_nanos(),
        }
    };

    GranularityReport {
        steps_observed: steps as u64,
        total_reads,
        mean_reads_per_step,
        resolution,
        step_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Simulated clock: `reads_per_tick` identical reads, then a jump of
    /// `tick_nanos`.
    fn stepped_source(reads_per_tick: u64, tick_nanos: u64) -> impl FnMut() -> TimePoint {
        let mut reads: u64 = 0;
        move || {
            reads += 1;
            TimePoint::from_raw_nanos((reads / reads_per_tick) * tick_nanos)
        }
    }

    #[test]
    fn test_measured_granularity() {
        let config = GranularityConfig { steps: 100 };
        let report = measure(stepped_source(10, 1_000), &config);

        assert_eq!(report.steps_observed, 100);
        assert!(report.mean_reads_per_step > 5.0);
        match report.resolution {
            GranularityResolution::Measured { mean_step_nanos } => {
                assert!((mean_step_nanos - 1_000.0).abs() < 1.0);
            }
            GranularityResolution::BelowMeasurement => {
                panic!("resolvable source reported below measurement")
            }
        }
    }

    #[test]
    fn test_below_measurement_resolution() {
        // Every read advances the value: the probe must refuse to report a
        // number.
        let config = GranularityConfig { steps: 100 };
        let report = measure(stepped_source(1, 25), &config);

        assert_eq!(report.mean_reads_per_step, 1.0);
        assert!(matches!(
            report.resolution,
            GranularityResolution::BelowMeasurement
        ));
    }

    #[test]
    fn test_real_clock_probe() {
        let clock = HiresClock::new();
        let config = GranularityConfig { steps: 500 };
        let report = run(&clock, &config);

        assert_eq!(report.steps_observed, 500);
        assert_eq!(report.step_summary.count(), 500);
        assert!(report.total_reads >= 500);
        assert!(report.mean_reads_per_step >= 1.0);
    }

    #[test]
    fn test_zero_steps_clamped() {
        let config = GranularityConfig { steps: 0 };
        let report = measure(stepped_source(2, 100), &config);
        assert_eq!(report.steps_observed, 1);
    }
}
