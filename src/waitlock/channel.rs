//! Rendezvous-channel wait lock
//!
//! This module suspends the waiting thread in a timed receive on a
//! zero-capacity channel. A zero-capacity send can only complete while a
//! receiver is blocked, so the lost-signal contract falls out of the
//! channel semantics directly: `try_send` on the wake path either hands the
//! signal to the in-flight waiter or fails and discards it.

use super::{StrategyKind, Wake, WaitLock, WakeHandle};
use crossbeam::channel::{bounded, Receiver, Sender};
use std::time::Duration;

/// Wake handle backed by the sending half of the rendezvous channel
struct ChannelWake {
    tx: Sender<()>,
}

impl Wake for ChannelWake {
    fn wake(&self) {
        // Succeeds only if a receiver is currently blocked in wait_for;
        // otherwise the signal is dropped.
        let _ = self.tx.try_send(());
    }
}

/// Rendezvous-channel based wait lock
pub struct ChannelWaitLock {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl ChannelWaitLock {
    /// Create a new rendezvous-channel wait lock
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self { tx, rx }
    }
}

impl Default for ChannelWaitLock {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitLock for ChannelWaitLock {
    fn wait_for(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        // Ok(()) is a wake, Err(Timeout) is the deadline; both return
        // silently. Disconnection cannot happen while self holds a sender.
        let _ = self.rx.recv_timeout(duration);
    }

    fn wake_handle(&self) -> WakeHandle {
        std::sync::Arc::new(ChannelWake {
            tx: self.tx.clone(),
        })
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Channel
    }
}
