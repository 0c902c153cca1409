//! Wait accuracy probe
//!
//! Issues a configurable number of wait requests with randomized target
//! durations drawn uniformly from a millisecond range, measures the actual
//! elapsed time around each wait, and reports per-requested-duration
//! buckets of observed mean and signed error. Systematic bias or
//! quantization (an OS primitive rounding waits up to a scheduler tick)
//! shows up as a bucket-independent offset or a staircase across buckets.
//!
//! Draws come from a seedable RNG so a calibration run can be reproduced
//! exactly when comparing strategies on the same machine.

use crate::clock::HiresClock;
use crate::stats::histogram::DeviationHistogram;
use crate::waitlock::{StrategyKind, WaitLock};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Wait probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitProbeConfig {
    /// Number of wait requests to issue
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Minimum requested duration in milliseconds (inclusive)
    #[serde(default = "default_min_ms")]
    pub min_ms: u64,
    /// Maximum requested duration in milliseconds (inclusive)
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
    /// RNG seed for the duration draw
    #[serde(default)]
    pub seed: u64,
}

fn default_samples() -> usize {
    600
}

fn default_min_ms() -> u64 {
    1
}

fn default_max_ms() -> u64 {
    120
}

impl Default for WaitProbeConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            min_ms: default_min_ms(),
            max_ms: default_max_ms(),
            seed: 0,
        }
    }
}

/// Per-requested-duration bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitBucket {
    /// Requested duration in milliseconds
    pub requested_ms: u64,
    /// Number of samples in this bucket
    pub samples: u64,
    /// Mean observed duration in nanoseconds
    pub mean_observed_nanos: f64,
    /// Mean signed error (observed - requested) in nanoseconds
    pub mean_error_nanos: f64,
}

/// Absolute-error distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPercentiles {
    pub min_nanos: u64,
    pub max_nanos: u64,
    pub mean_nanos: u64,
    pub p50_nanos: u64,
    pub p99_nanos: u64,
}

impl ErrorPercentiles {
    fn from_histogram(hist: &DeviationHistogram) -> Option<Self> {
        Some(Self {
            min_nanos: hist.min()?.as_nanos() as u64,
            max_nanos: hist.max()?.as_nanos() as u64,
            mean_nanos: hist.mean()?.as_nanos() as u64,
            p50_nanos: hist.percentile(50.0)?.as_nanos() as u64,
            p99_nanos: hist.percentile(99.0)?.as_nanos() as u64,
        })
    }
}

/// Wait probe report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitReport {
    /// Strategy the probed lock was built with
    pub strategy: StrategyKind,
    /// Total wait requests issued
    pub samples: u64,
    /// Mean absolute error across all requests in nanoseconds
    pub mean_abs_error_nanos: f64,
    /// Absolute-error distribution, absent for an empty run
    pub abs_error: Option<ErrorPercentiles>,
    /// Per-requested-millisecond buckets, ascending
    pub buckets: Vec<WaitBucket>,
}

/// Per-bucket accumulator
#[derive(Default)]
struct BucketAccum {
    samples: u64,
    sum_observed_nanos: u128,
    sum_error_nanos: i128,
}

/// Run the wait probe against a lock
pub fn run(lock: &mut dyn WaitLock, clock: &HiresClock, config: &WaitProbeConfig) -> WaitReport {
    let min_ms = config.min_ms.min(config.max_ms);
    let max_ms = config.max_ms.max(config.min_ms);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);

    let mut buckets: BTreeMap<u64, BucketAccum> = BTreeMap::new();
    let mut abs_error_hist = DeviationHistogram::new();
    let mut abs_error_sum: f64 = 0.0;

    for _ in 0..config.samples {
        let requested_ms = rng.gen_range(min_ms..=max_ms);
        let requested_nanos = requested_ms * 1_000_000;

        let start = clock.now();
        lock.wait_for(Duration::from_millis(requested_ms));
        let end = clock.now();

        let observed_nanos = end.nanos_since(start);
        let error_nanos = observed_nanos as i64 - requested_nanos as i64;

        let accum = buckets.entry(requested_ms).or_default();
        accum.samples += 1;
        accum.sum_observed_nanos += observed_nanos as u128;
        accum.sum_error_nanos += error_nanos as i128;

        let abs_error = error_nanos.unsigned_abs();
        abs_error_hist.record_nanos(abs_error);
        abs_error_sum += abs_error as f64;
    }

    let samples = config.samples as u64;
    let mean_abs_error_nanos = if samples > 0 {
        abs_error_sum / samples as f64
    } else {
        0.0
    };

    let buckets = buckets
        .into_iter()
        .map(|(requested_ms, accum)| WaitBucket {
            requested_ms,
            samples: accum.samples,
            mean_observed_nanos: accum.sum_observed_nanos as f64 / accum.samples as f64,
            mean_error_nanos: accum.sum_error_nanos as f64 / accum.samples as f64,
        })
        .collect();

    WaitReport {
        strategy: lock.kind(),
        samples,
        mean_abs_error_nanos,
        abs_error: ErrorPercentiles::from_histogram(&abs_error_hist),
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> WaitProbeConfig {
        WaitProbeConfig {
            samples: 20,
            min_ms: 1,
            max_ms: 5,
            seed,
        }
    }

    #[test]
    fn test_wait_probe_counts_and_bounds() {
        let clock = HiresClock::new();
        let mut lock = StrategyKind::Park.create();
        let report = run(lock.as_mut(), &clock, &small_config(7));

        assert_eq!(report.strategy, StrategyKind::Park);
        assert_eq!(report.samples, 20);
        assert_eq!(
            report.buckets.iter().map(|b| b.samples).sum::<u64>(),
            20
        );

        for bucket in &report.buckets {
            assert!(bucket.requested_ms >= 1 && bucket.requested_ms <= 5);
            // Waits return at or after the deadline: observed mean must not
            // undershoot the request by more than measurement tolerance.
            assert!(
                bucket.mean_error_nanos > -1_000_000.0,
                "bucket {}ms undershot: mean error {:.0}ns",
                bucket.requested_ms,
                bucket.mean_error_nanos
            );
        }
    }

    #[test]
    fn test_wait_probe_deterministic_draw() {
        let clock = HiresClock::new();

        let mut lock_a = StrategyKind::Park.create();
        let a = run(lock_a.as_mut(), &clock, &small_config(42));

        let mut lock_b = StrategyKind::Park.create();
        let b = run(lock_b.as_mut(), &clock, &small_config(42));

        // Same seed: identical requested-duration buckets with identical
        // sample counts (observed durations differ run to run).
        let a_keys: Vec<(u64, u64)> =
            a.buckets.iter().map(|b| (b.requested_ms, b.samples)).collect();
        let b_keys: Vec<(u64, u64)> =
            b.buckets.iter().map(|b| (b.requested_ms, b.samples)).collect();
        assert_eq!(a_keys, b_keys);
    }

    #[test]
    fn test_wait_probe_all_strategies() {
        let clock = HiresClock::new();
        let config = WaitProbeConfig {
            samples: 15,
            min_ms: 1,
            max_ms: 20,
            seed: 3,
        };

        let mut best_mean_abs = f64::INFINITY;
        for kind in StrategyKind::all() {
            let mut lock = kind.create();
            let report = run(lock.as_mut(), &clock, &config);

            assert_eq!(report.strategy, kind);
            assert!(report.mean_abs_error_nanos.is_finite());
            assert!(report.abs_error.is_some());
            best_mean_abs = best_mean_abs.min(report.mean_abs_error_nanos);
        }

        // At least one strategy should land within a couple of
        // milliseconds even on a loaded machine.
        assert!(
            best_mean_abs < 2_000_000.0,
            "best strategy mean abs error {:.0}ns",
            best_mean_abs
        );
    }

    #[test]
    fn test_wait_probe_swapped_range() {
        let clock = HiresClock::new();
        let mut lock = StrategyKind::Channel.create();
        let config = WaitProbeConfig {
            samples: 5,
            min_ms: 5,
            max_ms: 2,
            seed: 0,
        };
        let report = run(lock.as_mut(), &clock, &config);

        for bucket in &report.buckets {
            assert!(bucket.requested_ms >= 2 && bucket.requested_ms <= 5);
        }
    }

    #[test]
    fn test_wait_probe_empty_run() {
        let clock = HiresClock::new();
        let mut lock = StrategyKind::Condvar.create();
        let config = WaitProbeConfig {
            samples: 0,
            min_ms: 1,
            max_ms: 10,
            seed: 0,
        };
        let report = run(lock.as_mut(), &clock, &config);

        assert_eq!(report.samples, 0);
        assert!(report.buckets.is_empty());
        assert!(report.abs_error.is_none());
        assert_eq!(report.mean_abs_error_nanos, 0.0);
    }
}
