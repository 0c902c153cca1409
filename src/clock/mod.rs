//! High-resolution monotonic clock
//!
//! This module provides the nanosecond time source every other component
//! timestamps against. Uses direct libc calls to avoid the overhead of
//! Rust's Instant wrapper.
//!
//! The clock is a process-wide service value: construct one `HiresClock` at
//! startup and pass copies to the components that need it. It owns no
//! resources and needs no teardown.
//!
//! # Fallback
//!
//! If the fine-grained monotonic counter cannot be obtained from the OS, the
//! clock silently falls back to `CLOCK_MONOTONIC_COARSE` (~1ms resolution).
//! An experiment mid-session must not abort over a timing degradation, so
//! this is never an error; callers that care can check [`HiresClock::is_coarse`]
//! and the granularity probe will surface the degradation empirically.

use std::time::Duration;

/// Opaque monotonic timestamp
///
/// Integer nanoseconds since an arbitrary epoch fixed at process start.
/// Non-decreasing within a single process run; only meaningful for
/// differencing against another `TimePoint` from the same process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePoint {
    nanos: u64,
}

impl TimePoint {
    /// Raw nanosecond count since the clock epoch
    #[inline(always)]
    pub fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Nanoseconds elapsed since an earlier TimePoint
    ///
    /// Saturates to zero if `earlier` is actually later (the coarse clock can
    /// tick behind the fine clock; points from the same clock never invert).
    #[inline(always)]
    pub fn nanos_since(&self, earlier: TimePoint) -> u64 {
        self.nanos.saturating_sub(earlier.nanos)
    }

    /// Duration elapsed since an earlier TimePoint
    #[inline(always)]
    pub fn duration_since(&self, earlier: TimePoint) -> Duration {
        Duration::from_nanos(self.nanos_since(earlier))
    }

    /// The TimePoint one `offset` after this one
    #[inline(always)]
    pub fn add_nanos(&self, offset: u64) -> TimePoint {
        TimePoint {
            nanos: self.nanos.saturating_add(offset),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_raw_nanos(nanos: u64) -> TimePoint {
        TimePoint { nanos }
    }
}

/// High-resolution monotonic clock service
///
/// Thin wrapper over `clock_gettime` with `CLOCK_MONOTONIC`. `now()` never
/// blocks and never fails; all state beyond the OS counter itself is the
/// immutable source selection made at construction, so the value is freely
/// copyable across threads.
#[derive(Debug, Copy, Clone)]
pub struct HiresClock {
    /// Clock id selected at construction (fine counter, or coarse fallback)
    clock_id: libc::clockid_t,
}

impl HiresClock {
    /// Create a clock, probing the fine monotonic counter once
    ///
    /// Falls back silently to `CLOCK_MONOTONIC_COARSE` if the probe fails.
    pub fn new() -> Self {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: clock_gettime only writes the timespec we hand it.
        let ret = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };

        let clock_id = if ret == 0 {
            libc::CLOCK_MONOTONIC
        } else {
            libc::CLOCK_MONOTONIC_COARSE
        };

        Self { clock_id }
    }

    /// Read the current time
    ///
    /// Monotonically non-decreasing across calls from any thread.
    #[inline(always)]
    pub fn now(&self) -> TimePoint {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: clock_gettime only writes the timespec we hand it. The
        // clock id was validated at construction; a failure here would leave
        // ts zeroed, which still differences safely.
        unsafe {
            libc::clock_gettime(self.clock_id, &mut ts);
        }

        TimePoint {
            nanos: (ts.tv_sec as u64) * 1_000_000_000 + (ts.tv_nsec as u64),
        }
    }

    /// Whether the coarse fallback source is in use
    pub fn is_coarse(&self) -> bool {
        self.clock_id == libc::CLOCK_MONOTONIC_COARSE
    }
}

impl Default for HiresClock {
    fn default() -> Self {
        Self::new()
    }
}
