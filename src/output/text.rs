//! Human-readable text output

use crate::probe::frames::FrameReport;
use crate::probe::granularity::{GranularityReport, GranularityResolution};
use crate::probe::wait::WaitReport;
use crate::probe::HostInfo;
use crate::util::time::{format_duration, format_hz, format_signed_nanos};
use std::time::Duration;

/// Print the report banner and host context
pub fn print_header(host: &HostInfo) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                 CALIBRATION RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Host:");
    println!("  Captured: {}", host.captured_at);
    println!("  CPUs:     {}", host.cpus);
    if host.coarse_clock {
        println!("  Clock:    COARSE fallback (precision degraded)");
    } else {
        println!("  Clock:    fine monotonic");
    }
    println!();
}

/// Print the closing rule
pub fn print_footer() {
    println!("═══════════════════════════════════════════════════════════");
}

/// Print the granularity probe report
pub fn print_granularity(report: &GranularityReport) {
    println!("Clock Granularity:");
    println!("  Steps observed:   {}", report.steps_observed);
    println!("  Total reads:      {}", report.total_reads);
    println!("  Reads per step:   {:.2}", report.mean_reads_per_step);

    match &report.resolution {
        GranularityResolution::Measured { mean_step_nanos } => {
            println!(
                "  Granularity:      {} (mean step)",
                format_duration(Duration::from_nanos(mean_step_nanos.round() as u64))
            );
            println!(
                "  Step range:       {} .. {}",
                format_duration(report.step_summary.min()),
                format_duration(report.step_summary.max())
            );
        }
        GranularityResolution::BelowMeasurement => {
            println!("  Granularity:      below measurement resolution");
            println!("                    (every read advanced the clock)");
        }
    }

    println!();
}

/// Print the frame probe report
pub fn print_frames(report: &FrameReport) {
    println!("Frame Intervals:");
    println!("  Refresh rate:     {}", format_hz(report.refresh_hz));
    println!(
        "  Nominal frame:    {}",
        format_duration(Duration::from_nanos(report.nominal_frame_nanos))
    );
    println!("  Frames measured:  {}", report.frames_measured);
    println!("  Missed frames:    {}", report.missed_frames);
    println!(
        "  Min:    {}",
        format_duration(report.frame_summary.min())
    );
    println!(
        "  Mean:   {}",
        format_duration(report.frame_summary.mean())
    );
    println!(
        "  Max:    {}",
        format_duration(report.frame_summary.max())
    );
    println!(
        "  StdDev: {}",
        format_duration(report.frame_summary.stddev())
    );

    if let Some(ref window) = report.window {
        println!();
        println!(
            "  Aggregate window ({} frames, nominal {}):",
            window.frames_per_window,
            format_duration(Duration::from_nanos(window.nominal_window_nanos))
        );
        println!("    Windows: {}", window.windows_measured);
        println!(
            "    Min:    {}",
            format_duration(window.window_summary.min())
        );
        println!(
            "    Mean:   {}",
            format_duration(window.window_summary.mean())
        );
        println!(
            "    Max:    {}",
            format_duration(window.window_summary.max())
        );
        println!(
            "    StdDev: {}",
            format_duration(window.window_summary.stddev())
        );
    }

    println!();
}

/// Print a wait probe report, including the per-duration bucket table
pub fn print_wait(report: &WaitReport) {
    println!("Wait Accuracy ({} strategy):", report.strategy);
    println!("  Requests:         {}", report.samples);
    println!(
        "  Mean abs error:   {}",
        format_duration(Duration::from_nanos(report.mean_abs_error_nanos.round() as u64))
    );

    if let Some(ref err) = report.abs_error {
        println!("  Abs error:");
        println!(
            "    Min: {}  p50: {}  p99: {}  Max: {}",
            format_duration(Duration::from_nanos(err.min_nanos)),
            format_duration(Duration::from_nanos(err.p50_nanos)),
            format_duration(Duration::from_nanos(err.p99_nanos)),
            format_duration(Duration::from_nanos(err.max_nanos))
        );
    }

    if !report.buckets.is_empty() {
        println!();
        println!("  Requested   Samples   Mean Observed   Mean Error");
        for bucket in &report.buckets {
            println!(
                "  {:>7}ms   {:>7}   {:>13}   {:>10}",
                bucket.requested_ms,
                bucket.samples,
                format_duration(Duration::from_nanos(
                    bucket.mean_observed_nanos.round() as u64
                )),
                format_signed_nanos(bucket.mean_error_nanos.round() as i64)
            );
        }
    }

    println!();
}
