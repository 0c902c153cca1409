//! Measurement statistics
//!
//! Summary statistics over timing samples, plus a histogram for percentile
//! reporting. The probes accumulate raw nanosecond samples and reduce them
//! here; the reduction is the part of the measurement contract the
//! diagnostics reports expose (min/max/mean/standard deviation, and error
//! percentiles for the wait probe).

pub mod histogram;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Running summary of duration samples
///
/// Count, min, max, mean, and population standard deviation, accumulated
/// one sample at a time with Welford's recurrence so long probe runs lose
/// no precision to naive sum-of-squares.
#[derive(Debug, Clone)]
pub struct DurationSummary {
    count: u64,
    min_nanos: u64,
    max_nanos: u64,
    mean_nanos: f64,
    /// Welford M2 accumulator (sum of squared deviations from the mean)
    m2: f64,
}

/// Serialized form: the report-facing fields, with the M2 accumulator
/// replaced by the standard deviation it encodes
#[derive(Serialize, Deserialize)]
struct SummaryRepr {
    count: u64,
    min_nanos: u64,
    max_nanos: u64,
    mean_nanos: f64,
    stddev_nanos: f64,
}

impl Serialize for DurationSummary {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SummaryRepr {
            count: self.count,
            min_nanos: if self.count == 0 { 0 } else { self.min_nanos },
            max_nanos: self.max_nanos,
            mean_nanos: self.mean_nanos,
            stddev_nanos: self.stddev_nanos(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DurationSummary {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = SummaryRepr::deserialize(deserializer)?;
        Ok(Self {
            count: repr.count,
            min_nanos: if repr.count == 0 {
                u64::MAX
            } else {
                repr.min_nanos
            },
            max_nanos: repr.max_nanos,
            mean_nanos: repr.mean_nanos,
            m2: repr.stddev_nanos * repr.stddev_nanos * repr.count as f64,
        })
    }
}

impl DurationSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self {
            count: 0,
            min_nanos: u64::MAX,
            max_nanos: 0,
            mean_nanos: 0.0,
            m2: 0.0,
        }
    }

    /// Build a summary from a slice of nanosecond samples
    pub fn from_nanos(samples: &[u64]) -> Self {
        let mut summary = Self::new();
        for &nanos in samples {
            summary.record_nanos(nanos);
        }
        summary
    }

    /// Record one sample in nanoseconds
    #[inline]
    pub fn record_nanos(&mut self, nanos: u64) {
        self.count += 1;

        if nanos < self.min_nanos {
            self.min_nanos = nanos;
        }
        if nanos > self.max_nanos {
            self.max_nanos = nanos;
        }

        let value = nanos as f64;
        let delta = value - self.mean_nanos;
        self.mean_nanos += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_nanos);
    }

    /// Record one sample
    #[inline]
    pub fn record(&mut self, sample: Duration) {
        self.record_nanos(sample.as_nanos() as u64);
    }

    /// Number of samples recorded
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Check if no samples have been recorded
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Minimum sample
    pub fn min(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.min_nanos)
        }
    }

    /// Maximum sample
    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.max_nanos)
    }

    /// Mean sample as fractional nanoseconds
    pub fn mean_nanos(&self) -> f64 {
        self.mean_nanos
    }

    /// Mean sample
    pub fn mean(&self) -> Duration {
        Duration::from_nanos(self.mean_nanos.round() as u64)
    }

    /// Population standard deviation as fractional nanoseconds
    pub fn stddev_nanos(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }

    /// Population standard deviation
    pub fn stddev(&self) -> Duration {
        Duration::from_nanos(self.stddev_nanos().round() as u64)
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &DurationSummary) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let total = self.count + other.count;
        let delta = other.mean_nanos - self.mean_nanos;
        let merged_mean =
            self.mean_nanos + delta * other.count as f64 / total as f64;
        self.m2 += other.m2
            + delta * delta * self.count as f64 * other.count as f64 / total as f64;
        self.mean_nanos = merged_mean;
        self.count = total;
        self.min_nanos = self.min_nanos.min(other.min_nanos);
        self.max_nanos = self.max_nanos.max(other.max_nanos);
    }
}

impl Default for DurationSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_empty() {
        let summary = DurationSummary::new();
        assert_eq!(summary.count(), 0);
        assert!(summary.is_empty());
        assert_eq!(summary.min(), Duration::ZERO);
        assert_eq!(summary.max(), Duration::ZERO);
        assert_eq!(summary.mean(), Duration::ZERO);
        assert_eq!(summary.stddev(), Duration::ZERO);
    }

    #[test]
    fn test_summary_min_max_mean() {
        let summary = DurationSummary::from_nanos(&[3_000, 10_000, 5_000]);

        assert_eq!(summary.count(), 3);
        assert_eq!(summary.min(), Duration::from_nanos(3_000));
        assert_eq!(summary.max(), Duration::from_nanos(10_000));
        assert_eq!(summary.mean(), Duration::from_nanos(6_000));
    }

    #[test]
    fn test_summary_stddev() {
        // Samples {10, 20, 30}us: population stddev = sqrt(200/3)us
        let summary = DurationSummary::from_nanos(&[10_000, 20_000, 30_000]);
        let expected = (200_000_000.0f64 / 3.0).sqrt();
        assert!((summary.stddev_nanos() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_summary_single_sample_stddev_zero() {
        let summary = DurationSummary::from_nanos(&[42]);
        assert_eq!(summary.stddev_nanos(), 0.0);
    }

    #[test]
    fn test_summary_merge() {
        let mut a = DurationSummary::from_nanos(&[10, 20]);
        let b = DurationSummary::from_nanos(&[30, 40]);

        a.merge(&b);

        assert_eq!(a.count(), 4);
        assert_eq!(a.min(), Duration::from_nanos(10));
        assert_eq!(a.max(), Duration::from_nanos(40));
        assert_eq!(a.mean(), Duration::from_nanos(25));

        let direct = DurationSummary::from_nanos(&[10, 20, 30, 40]);
        assert!((a.stddev_nanos() - direct.stddev_nanos()).abs() < 1e-9);
    }

    #[test]
    fn test_summary_serde_roundtrip() {
        let summary = DurationSummary::from_nanos(&[10_000, 20_000, 30_000]);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("stddev_nanos"));

        let back: DurationSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.count(), 3);
        assert_eq!(back.min(), summary.min());
        assert_eq!(back.max(), summary.max());
        assert!((back.stddev_nanos() - summary.stddev_nanos()).abs() < 1e-6);
    }

    #[test]
    fn test_summary_merge_into_empty() {
        let mut a = DurationSummary::new();
        let b = DurationSummary::from_nanos(&[100, 200]);
        a.merge(&b);
        assert_eq!(a.count(), 2);
        assert_eq!(a.mean(), Duration::from_nanos(150));
    }
}
