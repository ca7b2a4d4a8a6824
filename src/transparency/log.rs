//! In-process transparency log.
//!
//! Counts what the probe did during this process: passes run, fields
//! gathered, snapshots exported. Counters live in memory only and are gone
//! when the process exits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Activity counters for the current process.
#[derive(Debug)]
pub struct TransparencyLog {
    /// Collection passes started
    passes_started: AtomicU64,
    /// Collection passes that produced a snapshot
    passes_completed: AtomicU64,
    /// Collection passes that failed or timed out
    passes_failed: AtomicU64,
    /// Category fields gathered across completed passes
    fields_collected: AtomicU64,
    /// Snapshots written to disk
    snapshots_exported: AtomicU64,
    session_start: DateTime<Utc>,
}

impl TransparencyLog {
    pub fn new() -> Self {
        Self {
            passes_started: AtomicU64::new(0),
            passes_completed: AtomicU64::new(0),
            passes_failed: AtomicU64::new(0),
            fields_collected: AtomicU64::new(0),
            snapshots_exported: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    pub fn record_pass_started(&self) {
        self.passes_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed pass and the number of fields it gathered.
    pub fn record_pass_completed(&self, fields: u64) {
        self.passes_completed.fetch_add(1, Ordering::Relaxed);
        self.fields_collected.fetch_add(fields, Ordering::Relaxed);
    }

    pub fn record_pass_failed(&self) {
        self.passes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_snapshot_exported(&self) {
        self.snapshots_exported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> TransparencyStats {
        TransparencyStats {
            passes_started: self.passes_started.load(Ordering::Relaxed),
            passes_completed: self.passes_completed.load(Ordering::Relaxed),
            passes_failed: self.passes_failed.load(Ordering::Relaxed),
            fields_collected: self.fields_collected.load(Ordering::Relaxed),
            snapshots_exported: self.snapshots_exported.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Collection passes started: {}\n\
             - Collection passes completed: {}\n\
             - Collection passes failed: {}\n\
             - Fields collected: {}\n\
             - Snapshots exported: {}\n\
             - Session duration: {} seconds\n\
             \n\
             Data Handling:\n\
             - Nothing is sent off this device\n\
             - Nothing is kept between runs unless you export it",
            stats.passes_started,
            stats.passes_completed,
            stats.passes_failed,
            stats.fields_collected,
            stats.snapshots_exported,
            stats.session_duration_secs
        )
    }

    pub fn reset(&self) {
        self.passes_started.store(0, Ordering::Relaxed);
        self.passes_completed.store(0, Ordering::Relaxed);
        self.passes_failed.store(0, Ordering::Relaxed);
        self.fields_collected.store(0, Ordering::Relaxed);
        self.snapshots_exported.store(0, Ordering::Relaxed);
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparencyStats {
    pub passes_started: u64,
    pub passes_completed: u64,
    pub passes_failed: u64,
    pub fields_collected: u64,
    pub snapshots_exported: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared transparency log.
pub type SharedTransparencyLog = Arc<TransparencyLog>;

pub fn create_shared_log() -> SharedTransparencyLog {
    Arc::new(TransparencyLog::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_counting() {
        let log = TransparencyLog::new();

        log.record_pass_started();
        log.record_pass_started();
        log.record_pass_completed(180);
        log.record_pass_failed();

        let stats = log.stats();
        assert_eq!(stats.passes_started, 2);
        assert_eq!(stats.passes_completed, 1);
        assert_eq!(stats.passes_failed, 1);
        assert_eq!(stats.fields_collected, 180);
    }

    #[test]
    fn test_reset() {
        let log = TransparencyLog::new();

        log.record_pass_completed(10);
        log.record_snapshot_exported();
        log.reset();

        let stats = log.stats();
        assert_eq!(stats.passes_completed, 0);
        assert_eq!(stats.fields_collected, 0);
        assert_eq!(stats.snapshots_exported, 0);
    }

    #[test]
    fn test_summary_format() {
        let log = TransparencyLog::new();
        let summary = log.summary();

        assert!(summary.contains("Collection passes started"));
        assert!(summary.contains("Snapshots exported"));
        assert!(summary.contains("Nothing is sent off this device"));
    }

    #[test]
    fn test_shared_log() {
        let log = create_shared_log();
        let other = Arc::clone(&log);
        other.record_snapshot_exported();
        assert_eq!(log.stats().snapshots_exported, 1);
    }
}
