//! JSON export of snapshots and reports.
//!
//! Files are named after the snapshot's collection date, so exporting twice
//! on the same day overwrites the earlier file.

use crate::core::{FingerprintReport, Snapshot};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: no snapshot has been collected")]
    NothingCollected,

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// `envprobe-data-YYYY-MM-DD.json`, dated by collection time.
pub fn snapshot_file_name(snapshot: &Snapshot) -> String {
    format!(
        "envprobe-data-{}.json",
        snapshot.collected_at.format("%Y-%m-%d")
    )
}

/// `envprobe-report-YYYY-MM-DD.json`, dated by report time.
pub fn report_file_name(report: &FingerprintReport) -> String {
    format!(
        "envprobe-report-{}.json",
        report.timestamp.format("%Y-%m-%d")
    )
}

pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Write a snapshot into `dir`, creating it if needed.
pub fn export_snapshot(snapshot: &Snapshot, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(snapshot_file_name(snapshot));
    std::fs::write(&path, snapshot_to_json(snapshot)?)?;
    tracing::info!(path = %path.display(), "snapshot exported");
    Ok(path)
}

/// Write a report into `dir`, creating it if needed.
pub fn export_report(report: &FingerprintReport, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(report));
    std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
    tracing::info!(path = %path.display(), "report exported");
    Ok(path)
}
