//! Video frame synchronization
//!
//! This module exposes the display refresh cycle as a blocking
//! synchronization point: `wait_for_frame_start` suspends the caller until
//! the next frame boundary (the start of the vertical blank interval) and
//! returns a clock timestamp taken immediately after the boundary was
//! observed, so stimulus onsets can be aligned and timestamped against the
//! same monotonic timeline as every other event.
//!
//! # Architecture
//!
//! The `FrameSync` trait provides a uniform, backend-agnostic interface.
//! Two backends ship in-tree:
//!
//! - **Software**: a synthetic display paced off the monotonic clock.
//!   Boundaries lie on a fixed lattice; waiting sleeps most of the interval
//!   and spins the rest. Portable, and the reference device for the frame
//!   probe and the test suite.
//! - **Timerfd**: a periodic absolute timer on `CLOCK_MONOTONIC` (Linux).
//!   The kernel wakes the caller at each expiration, the closest in-tree
//!   analogue to a driver vblank wait.
//!
//! A driver-level vblank binding would implement the same trait; its
//! device-open failure maps onto [`VideoError`] like the backends here.
//!
//! # Errors
//!
//! Synchronization being unavailable is a fatal configuration error raised
//! once at `open` time — an experiment cannot proceed without frame-accurate
//! presentation, and there is nothing to retry. After a successful open the
//! wait path never fails.

use crate::clock::{HiresClock, TimePoint};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod software;

#[cfg(target_os = "linux")]
pub mod timerfd;

/// Display refresh mode
///
/// The result of the "current display refresh mode" query: refresh rate and
/// resolution. The nominal frame duration is derived from the rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMode {
    /// Refresh rate in Hz
    pub refresh_hz: f64,
    /// Horizontal resolution in pixels
    pub width: u32,
    /// Vertical resolution in pixels
    pub height: u32,
}

impl DisplayMode {
    /// Nominal frame duration in nanoseconds (1e9 / refresh rate, rounded)
    pub fn frame_duration_nanos(&self) -> u64 {
        (1_000_000_000.0 / self.refresh_hz).round() as u64
    }

    /// Nominal frame duration
    pub fn frame_duration(&self) -> Duration {
        Duration::from_nanos(self.frame_duration_nanos())
    }

    /// Check the mode describes a refresh cycle a synchronizer can pace
    pub fn validate(&self) -> Result<(), VideoError> {
        if !self.refresh_hz.is_finite() || self.refresh_hz <= 0.0 || self.refresh_hz > 1000.0 {
            return Err(VideoError::UnsupportedRefreshRate(self.refresh_hz));
        }
        Ok(())
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            refresh_hz: 60.0,
            width: 1920,
            height: 1080,
        }
    }
}

/// Frame synchronization errors
///
/// All variants are raised at device-open time only.
#[derive(Debug, Error)]
pub enum VideoError {
    /// The refresh rate cannot be paced (non-finite, zero, or beyond 1 kHz)
    #[error("unsupported refresh rate: {0} Hz")]
    UnsupportedRefreshRate(f64),

    /// The OS timer backing the synchronizer could not be created or armed
    #[error("display timer initialization failed: {0}")]
    DeviceInit(#[from] std::io::Error),

    /// The selected backend is not available on this platform
    #[error("frame sync backend '{0}' is not available on this platform")]
    BackendUnavailable(&'static str),
}

/// Frame synchronization trait for all backends
///
/// # Thread Safety
///
/// A synchronizer is a singleton resource per display: `wait_for_frame_start`
/// takes `&mut self`, so concurrent waits on the same device are rejected at
/// compile time rather than left driver-dependent. Synchronizers are `Send`
/// and move to the presentation thread.
pub trait FrameSync: Send {
    /// Block until the display enters its next vertical blank interval
    ///
    /// Returns the clock timestamp taken immediately after the boundary was
    /// observed. If called when the current boundary has already passed, the
    /// wait targets the next one; missed boundaries are not queued.
    fn wait_for_frame_start(&mut self) -> TimePoint;

    /// Current refresh rate in Hz
    fn refresh_rate_hz(&self) -> f64;

    /// Nominal frame duration (1e9 / refresh rate nanoseconds)
    fn nominal_frame_duration(&self) -> Duration;
}

/// Frame synchronization backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncBackend {
    /// Synthetic display paced off the monotonic clock
    Software,
    /// Kernel periodic timer on CLOCK_MONOTONIC (Linux)
    Timerfd,
}

impl SyncBackend {
    /// Open a synchronizer for `mode` using this backend
    ///
    /// # Errors
    ///
    /// Returns a [`VideoError`] if the mode cannot be paced or the backing
    /// OS timer cannot be set up. This is the fatal configuration path; it
    /// is not retried.
    pub fn open(
        &self,
        mode: DisplayMode,
        clock: HiresClock,
    ) -> Result<Box<dyn FrameSync>, VideoError> {
        match self {
            SyncBackend::Software => Ok(Box::new(software::SoftwareFrameSync::open(mode, clock)?)),
            SyncBackend::Timerfd => {
                #[cfg(target_os = "linux")]
                {
                    Ok(Box::new(timerfd::TimerFrameSync::open(mode, clock)?))
                }
                #[cfg(not(target_os = "linux"))]
                {
                    let _ = (mode, clock);
                    Err(VideoError::BackendUnavailable("timerfd"))
                }
            }
        }
    }
}

impl Default for SyncBackend {
    fn default() -> Self {
        SyncBackend::Software
    }
}

impl std::fmt::Display for SyncBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncBackend::Software => write!(f, "software"),
            SyncBackend::Timerfd => write!(f, "timerfd"),
        }
    }
}
