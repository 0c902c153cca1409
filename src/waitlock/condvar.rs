//! Condition-variable wait lock
//!
//! This module provides the baseline suspension strategy: a mutex paired
//! with a condition variable. `wait_for` takes the lock, waits with a
//! timeout, and releases; the wake handle takes the lock, signals, and
//! releases.
//!
//! # Precision
//!
//! Condition-variable timeouts are serviced by the OS scheduler tick on
//! some platforms, so observed waits can quantize to the tick period. The
//! wait probe surfaces this per machine.

use super::{StrategyKind, Wake, WaitLock, WakeHandle};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// State shared between the waiting side and its wake handles
#[derive(Debug)]
struct Shared {
    /// True only while a thread is blocked in `wait_for`
    waiting: Mutex<bool>,
    signal: Condvar,
}

impl Wake for Shared {
    fn wake(&self) {
        // Lock poisoning is swallowed; a wake must never panic.
        let waiting = self
            .waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *waiting {
            self.signal.notify_one();
        }
        // No waiter: the signal is lost, by contract.
    }
}

/// Condition-variable based wait lock
pub struct CondvarWaitLock {
    shared: Arc<Shared>,
}

impl CondvarWaitLock {
    /// Create a new condition-variable wait lock
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                waiting: Mutex::new(false),
                signal: Condvar::new(),
            }),
        }
    }
}

impl Default for CondvarWaitLock {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitLock for CondvarWaitLock {
    fn wait_for(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        let mut waiting = self
            .shared
            .waiting
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *waiting = true;

        // A single timed wait: a spurious wakeup counts as an early wake,
        // the same as an explicit signal. The mutex is held from the flag
        // write until the condvar atomically releases it, so a wake cannot
        // slip in between registration and suspension.
        let (mut waiting, _timeout) = self
            .shared
            .signal
            .wait_timeout(waiting, duration)
            .unwrap_or_else(PoisonError::into_inner);
        *waiting = false;
    }

    fn wake_handle(&self) -> WakeHandle {
        self.shared.clone()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Condvar
    }
}
