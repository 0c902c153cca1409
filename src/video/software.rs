//! Software frame synchronizer
//!
//! This module paces a synthetic display off the monotonic clock. Frame
//! boundaries lie on a fixed lattice anchored at open time
//! (`phase + k * interval`), and waiting for a boundary sleeps the bulk of
//! the remaining interval and spin-waits the final stretch, so the return
//! lands within spin-loop resolution of the boundary instead of at the
//! mercy of sleep granularity.
//!
//! This backend doubles as the reference device for the frame probe and the
//! test suite: its boundaries are exactly periodic by construction, so any
//! jitter it reports is scheduler jitter, not device jitter.

use super::{DisplayMode, FrameSync, VideoError};
use crate::clock::{HiresClock, TimePoint};
use std::time::Duration;

/// Reserve this much of each wait for the spin stage
const SPIN_SLACK_NANOS: u64 = 500_000;

/// Synthetic display synchronizer paced off the monotonic clock
pub struct SoftwareFrameSync {
    clock: HiresClock,
    mode: DisplayMode,
    /// Nominal frame duration in nanoseconds
    interval_nanos: u64,
    /// The next unobserved lattice boundary
    next_boundary: TimePoint,
}

impl SoftwareFrameSync {
    /// Open a synthetic display with the given mode
    ///
    /// The boundary lattice is anchored at the current clock reading.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::UnsupportedRefreshRate`] if the mode cannot be
    /// paced.
    pub fn open(mode: DisplayMode, clock: HiresClock) -> Result<Self, VideoError> {
        mode.validate()?;
        let interval_nanos = mode.frame_duration_nanos();
        let next_boundary = clock.now().add_nanos(interval_nanos);

        Ok(Self {
            clock,
            mode,
            interval_nanos,
            next_boundary,
        })
    }
}

impl FrameSync for SoftwareFrameSync {
    fn wait_for_frame_start(&mut self) -> TimePoint {
        let now = self.clock.now();

        // Resynchronize onto the lattice if the target boundary already
        // passed: round the elapsed span up to the next interval multiple.
        // Missed boundaries are not queued.
        if now >= self.next_boundary {
            let behind = now.nanos_since(self.next_boundary);
            let skip = behind / self.interval_nanos + 1;
            self.next_boundary = self
                .next_boundary
                .add_nanos(skip * self.interval_nanos);
        }

        // Sleep stage: give the remainder minus the spin slack back to the
        // scheduler.
        let remaining = self.next_boundary.nanos_since(self.clock.now());
        if remaining > SPIN_SLACK_NANOS {
            std::thread::sleep(Duration::from_nanos(remaining - SPIN_SLACK_NANOS));
        }

        // Spin stage: burn the final stretch at clock resolution.
        while self.clock.now() < self.next_boundary {
            std::hint::spin_loop();
        }

        self.next_boundary = self.next_boundary.add_nanos(self.interval_nanos);
        self.clock.now()
    }

    fn refresh_rate_hz(&self) -> f64 {
        self.mode.refresh_hz
    }

    fn nominal_frame_duration(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos)
    }
}
