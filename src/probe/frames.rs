//! Frame duration and jitter probe
//!
//! Calls `wait_for_frame_start` N+1 times in a row, computes the N
//! inter-call deltas, and reports min/max/mean/standard deviation along
//! with a count of missed frames (deltas exceeding 1.5x the nominal frame
//! duration).
//!
//! Frames are additionally aggregated into a target window rounded to the
//! nearest whole number of frames, and the same statistics are reported
//! over window durations. Stimulus presentations span many frames; the
//! window statistics verify that frame-level jitter does not accumulate
//! into larger-scale timing error.

use crate::stats::DurationSummary;
use crate::video::FrameSync;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Missed-frame threshold as a multiple of the nominal frame duration
const MISSED_FRAME_FACTOR: f64 = 1.5;

/// Frame probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameProbeConfig {
    /// Number of inter-frame intervals to measure
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Target aggregate window in milliseconds; rounded to a whole number
    /// of frames
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_frames() -> usize {
    300
}

fn default_window_ms() -> u64 {
    200
}

impl Default for FrameProbeConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            window_ms: default_window_ms(),
        }
    }
}

/// Aggregate-window statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowReport {
    /// Frames per aggregate window
    pub frames_per_window: u64,
    /// Nominal window duration in nanoseconds (frames_per_window x nominal)
    pub nominal_window_nanos: u64,
    /// Number of complete windows measured
    pub windows_measured: u64,
    /// Distribution of window durations
    pub window_summary: DurationSummary,
}

/// Frame probe report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    /// Refresh rate the synchronizer reported
    pub refresh_hz: f64,
    /// Nominal frame duration in nanoseconds
    pub nominal_frame_nanos: u64,
    /// Number of inter-frame intervals measured
    pub frames_measured: u64,
    /// Intervals exceeding 1.5x the nominal frame duration
    pub missed_frames: u64,
    /// Distribution of inter-frame intervals
    pub frame_summary: DurationSummary,
    /// Aggregate-window statistics, absent if fewer frames than one window
    pub window: Option<WindowReport>,
}

/// Run the frame probe against a synchronizer
pub fn run(sync: &mut dyn FrameSync, config: &FrameProbeConfig) -> FrameReport {
    let frames = config.frames.max(1);
    let nominal_nanos = sync.nominal_frame_duration().as_nanos() as u64;
    let missed_threshold = (nominal_nanos as f64 * MISSED_FRAME_FACTOR) as u64;

    let mut deltas: Vec<u64> = Vec::with_capacity(frames);
    let mut prev = sync.wait_for_frame_start();
    for _ in 0..frames {
        let next = sync.wait_for_frame_start();
        deltas.push(next.nanos_since(prev));
        prev = next;
    }

    let frame_summary = DurationSummary::from_nanos(&deltas);
    let missed_frames = deltas.iter().filter(|&&d| d > missed_threshold).count() as u64;

    let window = reduce_windows(&deltas, nominal_nanos, Duration::from_millis(config.window_ms));

    FrameReport {
        refresh_hz: sync.refresh_rate_hz(),
        nominal_frame_nanos: nominal_nanos,
        frames_measured: deltas.len() as u64,
        missed_frames,
        frame_summary,
        window,
    }
}

/// Aggregate consecutive deltas into whole-frame windows
fn reduce_windows(
    deltas: &[u64],
    nominal_nanos: u64,
    target_window: Duration,
) -> Option<WindowReport> {
    let target_nanos = target_window.as_nanos() as u64;
    let frames_per_window =
        ((target_nanos as f64 / nominal_nanos as f64).round() as u64).max(1) as usize;

    if deltas.len() < frames_per_window {
        return None;
    }

    let mut window_summary = DurationSummary::new();
    for chunk in deltas.chunks_exact(frames_per_window) {
        window_summary.record_nanos(chunk.iter().sum());
    }

    Some(WindowReport {
        frames_per_window: frames_per_window as u64,
        nominal_window_nanos: frames_per_window as u64 * nominal_nanos,
        windows_measured: window_summary.count(),
        window_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::HiresClock;
    use crate::video::software::SoftwareFrameSync;
    use crate::video::DisplayMode;

    fn synthetic_display(hz: f64) -> SoftwareFrameSync {
        let mode = DisplayMode {
            refresh_hz: hz,
            ..DisplayMode::default()
        };
        SoftwareFrameSync::open(mode, HiresClock::new()).unwrap()
    }

    #[test]
    fn test_frame_probe_counts() {
        let mut sync = synthetic_display(250.0);
        let config = FrameProbeConfig {
            frames: 25,
            window_ms: 20,
        };
        let report = run(&mut sync, &config);

        assert_eq!(report.frames_measured, 25);
        assert_eq!(report.frame_summary.count(), 25);
        assert_eq!(report.nominal_frame_nanos, 4_000_000);
        assert_eq!(report.refresh_hz, 250.0);
    }

    #[test]
    fn test_frame_probe_no_missed_frames_on_synthetic_display() {
        // 100 Hz leaves 5ms of scheduler slack before an interval counts
        // as missed; the synthetic display spins onto each boundary.
        let mut sync = synthetic_display(100.0);
        let config = FrameProbeConfig {
            frames: 20,
            window_ms: 50,
        };
        let report = run(&mut sync, &config);

        assert_eq!(report.missed_frames, 0);

        let mean = report.frame_summary.mean_nanos();
        assert!(
            (mean - 10_000_000.0).abs() < 100_000.0,
            "mean interval {:.0}ns deviates more than 1% from 10ms",
            mean
        );
    }

    #[test]
    fn test_frame_probe_windows() {
        let mut sync = synthetic_display(200.0);
        let config = FrameProbeConfig {
            frames: 20,
            window_ms: 25,
        };
        let report = run(&mut sync, &config);

        let window = report.window.expect("window stats expected");
        assert_eq!(window.frames_per_window, 5);
        assert_eq!(window.nominal_window_nanos, 25_000_000);
        assert_eq!(window.windows_measured, 4);

        // Window jitter must not exceed accumulated per-frame jitter.
        let mean = window.window_summary.mean_nanos();
        assert!(
            (mean - 25_000_000.0).abs() < 500_000.0,
            "mean window {:.0}ns far from nominal 25ms",
            mean
        );
    }

    #[test]
    fn test_window_reduction_rounds_to_whole_frames() {
        // 4ms frames, 9ms target: 2.25 frames rounds to 2 per window.
        let deltas = vec![4_000_000u64; 10];
        let report = reduce_windows(&deltas, 4_000_000, Duration::from_millis(9)).unwrap();

        assert_eq!(report.frames_per_window, 2);
        assert_eq!(report.windows_measured, 5);
        assert_eq!(report.window_summary.mean(), Duration::from_millis(8));

        // 4ms frames, 11ms target: 2.75 frames rounds to 3 per window.
        let report = reduce_windows(&deltas, 4_000_000, Duration::from_millis(11)).unwrap();
        assert_eq!(report.frames_per_window, 3);
        assert_eq!(report.windows_measured, 3);
        assert_eq!(report.window_summary.mean(), Duration::from_millis(12));
    }

    #[test]
    fn test_window_reduction_too_few_frames() {
        let deltas = vec![4_000_000u64; 3];
        assert!(reduce_windows(&deltas, 4_000_000, Duration::from_millis(200)).is_none());
    }

    #[test]
    fn test_missed_frame_threshold() {
        // One interval at 2x nominal among nominal intervals.
        let mut deltas = vec![10_000_000u64; 9];
        deltas.push(20_000_000);

        let summary = DurationSummary::from_nanos(&deltas);
        let threshold = (10_000_000.0 * MISSED_FRAME_FACTOR) as u64;
        let missed = deltas.iter().filter(|&&d| d > threshold).count();

        assert_eq!(missed, 1);
        assert_eq!(summary.max(), Duration::from_millis(20));
    }
}
