//! Report output
//!
//! Renders probe reports as human-readable tables on stdout and as JSON
//! documents for archiving calibration runs.

pub mod json;
pub mod text;
