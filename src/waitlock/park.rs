//! Thread-parking wait lock
//!
//! This module suspends the waiting thread with `thread::park_timeout` and
//! records its handle in a single slot; the wake handle unparks the
//! recorded thread if one is present. Parking avoids the condvar's mutex
//! round-trip on the wake path and on many platforms services nanosecond
//! timeouts with the finest granularity of the three strategies.
//!
//! The single slot is sound because a lock admits at most one waiter at a
//! time (`wait_for` takes `&mut self`). Allowing concurrent waiters would
//! require a waiter set with defined multi-wake semantics.

use super::{StrategyKind, Wake, WaitLock, WakeHandle};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, Thread};
use std::time::Duration;

/// Registration slot for the currently waiting thread
#[derive(Debug)]
struct Slot {
    waiter: Mutex<Option<Thread>>,
}

impl Wake for Slot {
    fn wake(&self) {
        let waiter = self
            .waiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(thread) = waiter.as_ref() {
            thread.unpark();
        }
        // Empty slot: the signal is lost, by contract.
    }
}

/// Thread-park based wait lock
pub struct ParkWaitLock {
    slot: Arc<Slot>,
}

impl ParkWaitLock {
    /// Create a new thread-park wait lock
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Slot {
                waiter: Mutex::new(None),
            }),
        }
    }
}

impl Default for ParkWaitLock {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitLock for ParkWaitLock {
    fn wait_for(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        // A wake that observed the previous wait's registration after that
        // wait already returned leaves a stored unpark token on this
        // thread. Drain it so it cannot shorten this wait.
        thread::park_timeout(Duration::ZERO);

        {
            let mut waiter = self
                .slot
                .waiter
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *waiter = Some(thread::current());
        }

        // A wake between registration and this park stores the unpark
        // token, so the park returns immediately; a spurious return counts
        // as an early wake, the same as an explicit signal.
        thread::park_timeout(duration);

        let mut waiter = self
            .slot
            .waiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *waiter = None;
    }

    fn wake_handle(&self) -> WakeHandle {
        self.slot.clone()
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Park
    }
}
