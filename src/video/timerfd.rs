//! Timerfd frame synchronizer (Linux)
//!
//! This module arms a periodic kernel timer on `CLOCK_MONOTONIC` and blocks
//! in `read(2)` until the next expiration. The kernel drives the wakeup, so
//! unlike the software backend no user-space spinning is involved; boundary
//! accuracy is whatever the kernel's high-resolution timer delivers.
//!
//! Each read drains the expiration counter. A count above one means the
//! caller slept through boundaries; those are consumed and not replayed,
//! matching the no-queuing contract.

use super::{DisplayMode, FrameSync, VideoError};
use crate::clock::{HiresClock, TimePoint};
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Kernel periodic-timer synchronizer
pub struct TimerFrameSync {
    clock: HiresClock,
    mode: DisplayMode,
    interval_nanos: u64,
    fd: RawFd,
}

impl TimerFrameSync {
    /// Open a periodic timer paced at the mode's refresh rate
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::UnsupportedRefreshRate`] if the mode cannot be
    /// paced, or [`VideoError::DeviceInit`] if the kernel timer cannot be
    /// created or armed.
    pub fn open(mode: DisplayMode, clock: HiresClock) -> Result<Self, VideoError> {
        mode.validate()?;
        let interval_nanos = mode.frame_duration_nanos();

        // SAFETY: timerfd_create takes no pointers; a negative return is an
        // error reported through errno.
        let fd = unsafe { libc::timerfd_create(libc::CLOCK_MONOTONIC, libc::TFD_CLOEXEC) };
        if fd < 0 {
            return Err(VideoError::DeviceInit(std::io::Error::last_os_error()));
        }

        let interval = libc::timespec {
            tv_sec: (interval_nanos / 1_000_000_000) as libc::time_t,
            tv_nsec: (interval_nanos % 1_000_000_000) as libc::c_long,
        };
        let spec = libc::itimerspec {
            it_interval: interval,
            it_value: interval,
        };

        // SAFETY: fd was just created; spec outlives the call.
        let ret = unsafe { libc::timerfd_settime(fd, 0, &spec, std::ptr::null_mut()) };
        if ret < 0 {
            let err = std::io::Error::last_os_error();
            // SAFETY: fd is open and owned here.
            unsafe {
                libc::close(fd);
            }
            return Err(VideoError::DeviceInit(err));
        }

        Ok(Self {
            clock,
            mode,
            interval_nanos,
            fd,
        })
    }
}

impl FrameSync for TimerFrameSync {
    fn wait_for_frame_start(&mut self) -> TimePoint {
        let mut expirations: u64 = 0;

        loop {
            // SAFETY: the buffer is 8 bytes of owned stack memory, the size
            // a timerfd read requires.
            let ret = unsafe {
                libc::read(
                    self.fd,
                    &mut expirations as *mut u64 as *mut libc::c_void,
                    std::mem::size_of::<u64>(),
                )
            };

            if ret >= 0 {
                break;
            }

            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                // An interrupted wait resumes; it is never surfaced.
                continue;
            }

            // Any other read failure degrades to an unsynchronized return;
            // the wait path must not fail after a successful open.
            break;
        }

        self.clock.now()
    }

    fn refresh_rate_hz(&self) -> f64 {
        self.mode.refresh_hz
    }

    fn nominal_frame_duration(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos)
    }
}

impl Drop for TimerFrameSync {
    fn drop(&mut self) {
        // SAFETY: fd is open and owned by self.
        unsafe {
            libc::close(self.fd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(hz: f64) -> DisplayMode {
        DisplayMode {
            refresh_hz: hz,
            ..DisplayMode::default()
        }
    }

    #[test]
    fn test_timerfd_open() {
        let sync = TimerFrameSync::open(mode(100.0), HiresClock::new()).unwrap();
        assert_eq!(sync.refresh_rate_hz(), 100.0);
        assert_eq!(sync.nominal_frame_duration(), Duration::from_millis(10));
    }

    #[test]
    fn test_timerfd_open_rejects_invalid_mode() {
        let result = TimerFrameSync::open(mode(-1.0), HiresClock::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_timerfd_paces_frames() {
        let mut sync = TimerFrameSync::open(mode(200.0), HiresClock::new()).unwrap();

        let first = sync.wait_for_frame_start();
        let mut prev = first;
        for _ in 0..10 {
            let next = sync.wait_for_frame_start();
            assert!(next > prev);
            prev = next;
        }

        // 10 intervals at 5ms nominal: allow generous scheduler slack.
        let total = prev.nanos_since(first);
        assert!(
            total >= 45_000_000 && total <= 150_000_000,
            "10 frames spanned {}ns",
            total
        );
    }
}
