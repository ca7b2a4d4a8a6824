//! Transparency counters.
//!
//! Tracks what the probe has read and written during this process so the
//! user can audit it.

pub mod log;

pub use log::{create_shared_log, SharedTransparencyLog, TransparencyLog, TransparencyStats};
