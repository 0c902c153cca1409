//! Timing format utilities
//!
//! This module provides helpers for formatting durations and rates in the
//! human-readable reports produced by the probes.

use std::time::Duration;

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use framepulse::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Format a signed nanosecond offset (e.g. wait bias) in human-readable form
///
/// # Examples
///
/// ```
/// use framepulse::util::time::format_signed_nanos;
///
/// assert_eq!(format_signed_nanos(500), "+500ns");
/// assert_eq!(format_signed_nanos(-1_500_000), "-1.50ms");
/// ```
pub fn format_signed_nanos(nanos: i64) -> String {
    let sign = if nanos < 0 { "-" } else { "+" };
    format!("{}{}", sign, format_duration(Duration::from_nanos(nanos.unsigned_abs())))
}

/// Format a refresh rate in Hz
///
/// # Examples
///
/// ```
/// use framepulse::util::time::format_hz;
///
/// assert_eq!(format_hz(60.0), "60.00 Hz");
/// assert_eq!(format_hz(59.94), "59.94 Hz");
/// ```
pub fn format_hz(hz: f64) -> String {
    format!("{:.2} Hz", hz)
}

/// Calculate the mean of a slice of nanosecond samples
///
/// Returns 0.0 for an empty slice.
pub fn mean_nanos(samples: &[u64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&v| v as f64).sum::<f64>() / samples.len() as f64
}

/// Calculate the population standard deviation of a slice of nanosecond samples
///
/// Returns 0.0 for slices with fewer than two samples.
pub fn stddev_nanos(samples: &[u64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let mean = mean_nanos(samples);
    let variance = samples
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / samples.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
        assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
    }

    #[test]
    fn test_format_signed_nanos() {
        assert_eq!(format_signed_nanos(0), "+0ns");
        assert_eq!(format_signed_nanos(250), "+250ns");
        assert_eq!(format_signed_nanos(-250), "-250ns");
        assert_eq!(format_signed_nanos(1_500_000), "+1.50ms");
    }

    #[test]
    fn test_format_hz() {
        assert_eq!(format_hz(100.0), "100.00 Hz");
        assert_eq!(format_hz(59.94), "59.94 Hz");
    }

    #[test]
    fn test_mean_nanos() {
        assert_eq!(mean_nanos(&[]), 0.0);
        assert_eq!(mean_nanos(&[10, 20, 30]), 20.0);
    }

    #[test]
    fn test_stddev_nanos() {
        assert_eq!(stddev_nanos(&[]), 0.0);
        assert_eq!(stddev_nanos(&[10]), 0.0);
        // Samples {10, 20, 30}: population stddev = sqrt(200/3)
        let sd = stddev_nanos(&[10, 20, 30]);
        assert!((sd - (200.0f64 / 3.0).sqrt()).abs() < 1e-9);
    }
}
