//! Deviation histogram using HdrHistogram
//!
//! This module wraps the HdrHistogram library for tracking timing
//! deviations (wait error, boundary jitter) with high precision and low
//! overhead, so the wait probe can report accurate error percentiles
//! alongside its per-bucket means.
//!
//! # Example
//!
//! ```
//! use framepulse::stats::histogram::DeviationHistogram;
//! use std::time::Duration;
//!
//! let mut hist = DeviationHistogram::new();
//!
//! hist.record(Duration::from_micros(100));
//! hist.record(Duration::from_micros(150));
//!
//! let p99 = hist.percentile(99.0);
//! println!("p99 deviation: {:?}", p99);
//! ```

use crate::Result;
use hdrhistogram::Histogram;
use std::time::Duration;

/// Largest recordable deviation: 10 seconds in nanoseconds
const MAX_DEVIATION_NANOS: u64 = 10_000_000_000;

/// Timing deviation histogram
///
/// Configured to track deviations from 1 nanosecond to 10 seconds with 3
/// significant digits (0.1% value precision). Recording and percentile
/// queries are O(1); out-of-range values are clamped, not dropped.
#[derive(Debug)]
pub struct DeviationHistogram {
    histogram: Histogram<u64>,
}

impl DeviationHistogram {
    /// Create a new deviation histogram
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_DEVIATION_NANOS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    /// Record a deviation sample
    ///
    /// Values are clamped to the histogram's range.
    #[inline]
    pub fn record(&mut self, deviation: Duration) {
        let nanos = deviation.as_nanos() as u64;
        let value = nanos.clamp(1, MAX_DEVIATION_NANOS);
        let _ = self.histogram.record(value);
    }

    /// Record a deviation in raw nanoseconds
    #[inline]
    pub fn record_nanos(&mut self, nanos: u64) {
        self.record(Duration::from_nanos(nanos));
    }

    /// Value at a percentile (0.0 - 100.0), or None if empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(
            self.histogram.value_at_percentile(percentile),
        ))
    }

    /// Minimum recorded deviation, or None if empty
    pub fn min(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.min()))
    }

    /// Maximum recorded deviation, or None if empty
    pub fn max(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.max()))
    }

    /// Mean deviation, or None if empty
    pub fn mean(&self) -> Option<Duration> {
        if self.histogram.len() == 0 {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.mean() as u64))
    }

    /// Number of samples recorded
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }

    /// Merge another histogram into this one
    pub fn merge(&mut self, other: &DeviationHistogram) -> Result<()> {
        self.histogram
            .add(&other.histogram)
            .map_err(|e| anyhow::anyhow!("Failed to merge histograms: {}", e))?;
        Ok(())
    }

    /// Reset the histogram to empty state
    pub fn reset(&mut self) {
        self.histogram.reset();
    }
}

impl Default for DeviationHistogram {
    fn default() -> Self {
        Self::new()
    }
}
