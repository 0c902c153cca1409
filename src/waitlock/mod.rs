//! Wait-lock abstraction
//!
//! This module defines the core thread-suspension abstraction in FramePulse.
//! A wait lock suspends the calling thread for a bounded duration and can be
//! woken early by an external signal. Different strategies use different OS
//! suspension mechanisms (condition variable, rendezvous channel, thread
//! parking) with varying wake-latency and timer-granularity characteristics.
//!
//! # Architecture
//!
//! The `WaitLock` trait provides a uniform interface that all strategies must
//! implement. This allows the presentation run loop and the diagnostics
//! probes to be agnostic to the underlying suspension mechanism, enabling
//! runtime selection of the most accurate strategy for the deployment
//! machine (use the wait probe to pick empirically).
//!
//! # Strategy Types
//!
//! - **Condvar**: mutex + condition variable with timeout (baseline, portable)
//! - **Channel**: zero-capacity rendezvous channel; a wake only lands if a
//!   receiver is currently blocked
//! - **Park**: parks the calling thread with a nanosecond timeout; the wake
//!   handle unparks the registered thread
//!
//! # Signal semantics
//!
//! Wakes are one-shot and fire-and-forget. If no thread is waiting, the
//! signal is lost; it does not pre-arm a future wait. Callers that need
//! guaranteed delivery must set their own flag before waiting and re-check
//! it on return — a resuming waiter cannot distinguish a wake from a
//! timeout.
//!
//! # Example
//!
//! ```
//! use framepulse::waitlock::StrategyKind;
//! use std::time::Duration;
//!
//! let mut lock = StrategyKind::Park.create();
//! let handle = lock.wake_handle();
//!
//! // No waiter yet: this signal is discarded, not stored.
//! handle.wake();
//!
//! // Another thread would call handle.wake() to end the wait early.
//! lock.wait_for(Duration::from_millis(1));
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub mod channel;
pub mod condvar;
pub mod park;

/// Wait-lock trait for all suspension strategies
///
/// # Lifecycle
///
/// 1. Create via [`StrategyKind::create`] (or a concrete type's `new()`)
/// 2. Hand out wake handles via `wake_handle()`
/// 3. Call `wait_for()` from the (single) waiting thread
///
/// # Thread Safety
///
/// Locks are `Send` so they can move to the presentation thread, but
/// `wait_for` takes `&mut self`: at most one thread may wait on a lock at a
/// time, enforced by the borrow rather than documented convention. Wake
/// handles are freely cloneable and shareable.
///
/// # Error Handling
///
/// No method returns a `Result`. A spurious or interrupted wake is treated
/// as a normal early wake; timing code must not fail mid-presentation.
pub trait WaitLock: Send {
    /// Suspend the calling thread for up to `duration`
    ///
    /// Returns early if a wake handle for this lock is fired while waiting,
    /// and at or after the deadline otherwise (best-effort; the scheduler
    /// imposes jitter). `wait_for(Duration::ZERO)` returns immediately
    /// without touching the suspension primitive.
    fn wait_for(&mut self, duration: Duration);

    /// Get a handle that can wake the current (or a future in-flight) wait
    ///
    /// Handles are cheap to clone and safe to fire from any thread at any
    /// time; firing with no waiter present has no effect.
    fn wake_handle(&self) -> WakeHandle;

    /// The strategy this lock was built with
    fn kind(&self) -> StrategyKind;
}

/// Wake side of a wait lock
///
/// `wake()` is non-blocking and idempotent. It wakes the thread currently
/// blocked in [`WaitLock::wait_for`] on the issuing lock, if any; otherwise
/// the signal is discarded.
pub trait Wake: Send + Sync {
    /// Fire the one-shot wake signal
    fn wake(&self);
}

/// Shared, cloneable wake handle
pub type WakeHandle = Arc<dyn Wake>;

/// Suspension strategy selector
///
/// The three strategies are contract-identical; which one hits the
/// sub-millisecond precision target depends on the OS and scheduler. The
/// wait probe reports per-strategy accuracy so deployments can choose
/// empirically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Mutex + condition variable with timeout
    Condvar,
    /// Zero-capacity rendezvous channel
    Channel,
    /// Thread parking with nanosecond timeout
    Park,
}

impl StrategyKind {
    /// Construct a wait lock using this strategy
    pub fn create(&self) -> Box<dyn WaitLock> {
        match self {
            StrategyKind::Condvar => Box::new(condvar::CondvarWaitLock::new()),
            StrategyKind::Channel => Box::new(channel::ChannelWaitLock::new()),
            StrategyKind::Park => Box::new(park::ParkWaitLock::new()),
        }
    }

    /// All selectable strategies, in report order
    pub fn all() -> [StrategyKind; 3] {
        [
            StrategyKind::Condvar,
            StrategyKind::Channel,
            StrategyKind::Park,
        ]
    }
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Park
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Condvar => write!(f, "condvar"),
            StrategyKind::Channel => write!(f, "channel"),
            StrategyKind::Park => write!(f, "park"),
        }
    }
}
