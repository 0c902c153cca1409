//! FramePulse - Presentation-timing measurement and calibration tool
//!
//! FramePulse is the run-time timing core of a stimulus-presentation platform
//! together with the calibration tooling that validates its precision on a
//! given machine.
//!
//! # Architecture
//!
//! - **Monotonic clock**: nanosecond timestamps via direct clock_gettime
//! - **Wait locks**: interchangeable timed-suspension strategies (condvar, channel, park)
//! - **Frame sync**: blocking synchronization with the display refresh cycle
//! - **Probes**: clock granularity, frame jitter, and wait accuracy diagnostics
//! - **Comprehensive reports**: per-bucket wait bias, missed-frame counts, error percentiles

pub mod clock;
pub mod config;
pub mod output;
pub mod probe;
pub mod stats;
pub mod util;
pub mod video;
pub mod waitlock;

// Re-export commonly used types
pub use clock::{HiresClock, TimePoint};
pub use waitlock::WaitLock;

/// Result type used throughout FramePulse
pub type Result<T> = anyhow::Result<T>;
