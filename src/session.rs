//! Caller-side collection runner.
//!
//! [`ProbeSession`] owns the latest snapshot and report and runs passes on
//! demand. A pass runs on its own task, optionally bounded by a deadline.
//! A failed pass records a generic, retryable error and leaves the
//! previous snapshot in place.

use crate::collector::Category;
use crate::core::{collect_and_score, FingerprintReport, Snapshot};
use crate::env::EnvironmentProvider;
use crate::export::{export_report, export_snapshot, ExportError};
use crate::transparency::{create_shared_log, SharedTransparencyLog};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Message shown to users when a pass fails.
pub const COLLECTION_ERROR_MESSAGE: &str =
    "Unable to collect data. Please try refreshing the page or check your browser settings.";

/// Failure of a whole collection pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("collection pass exceeded its deadline of {0:?}")]
    TimedOut(Duration),

    #[error("collection pass aborted: {0}")]
    Aborted(String),
}

pub struct ProbeSession {
    env: Arc<dyn EnvironmentProvider>,
    deadline: Option<Duration>,
    log: SharedTransparencyLog,
    snapshot: Option<Snapshot>,
    report: Option<FingerprintReport>,
    error: Option<String>,
    is_collecting: bool,
}

impl ProbeSession {
    pub fn new(env: Arc<dyn EnvironmentProvider>) -> Self {
        Self {
            env,
            deadline: None,
            log: create_shared_log(),
            snapshot: None,
            report: None,
            error: None,
            is_collecting: false,
        }
    }

    /// Abandon passes that run longer than `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_log(mut self, log: SharedTransparencyLog) -> Self {
        self.log = log;
        self
    }

    /// Run one collection pass and keep its result.
    ///
    /// Taking `&mut self` keeps a second pass from starting while one is
    /// outstanding.
    ///
    /// Dropping the returned future abandons the pass: its task is aborted
    /// and the session no longer reports it as collecting.
    pub async fn refresh(&mut self) -> Result<(), CollectionError> {
        self.log.record_pass_started();

        let result = {
            let _collecting = CollectingFlag::raise(&mut self.is_collecting);
            run_pass(Arc::clone(&self.env), self.deadline).await
        };

        match result {
            Ok((snapshot, report)) => {
                let fields: usize = Category::ALL
                    .iter()
                    .map(|category| snapshot.category_field_count(*category))
                    .sum();
                self.log.record_pass_completed(fields as u64);
                self.snapshot = Some(snapshot);
                self.report = Some(report);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "collection pass failed");
                self.log.record_pass_failed();
                self.error = Some(COLLECTION_ERROR_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    /// Latest successfully collected snapshot.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn report(&self) -> Option<&FingerprintReport> {
        self.report.as_ref()
    }

    /// Displayable error of the last pass, cleared by a successful pass.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_collecting(&self) -> bool {
        self.is_collecting
    }

    pub fn log(&self) -> &SharedTransparencyLog {
        &self.log
    }

    /// Export the latest snapshot (and report) into `dir`.
    pub fn export(&self, dir: &Path, with_report: bool) -> Result<Vec<PathBuf>, ExportError> {
        let snapshot = self.snapshot.as_ref().ok_or(ExportError::NothingCollected)?;
        let mut written = vec![export_snapshot(snapshot, dir)?];
        self.log.record_snapshot_exported();

        if with_report {
            if let Some(report) = &self.report {
                written.push(export_report(report, dir)?);
            }
        }
        Ok(written)
    }
}

/// Holds `is_collecting` up for as long as a pass is outstanding.
struct CollectingFlag<'a>(&'a mut bool);

impl<'a> CollectingFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for CollectingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Spawned pass, aborted when dropped unfinished.
struct PassTask(JoinHandle<(Snapshot, FingerprintReport)>);

impl Drop for PassTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn run_pass(
    env: Arc<dyn EnvironmentProvider>,
    deadline: Option<Duration>,
) -> Result<(Snapshot, FingerprintReport), CollectionError> {
    let mut task = PassTask(tokio::spawn(async move {
        collect_and_score(env.as_ref()).await
    }));

    let joined = match deadline {
        Some(limit) => match tokio::time::timeout(limit, &mut task.0).await {
            Ok(joined) => joined,
            Err(_) => return Err(CollectionError::TimedOut(limit)),
        },
        None => (&mut task.0).await,
    };

    joined.map_err(|err| CollectionError::Aborted(err.to_string()))
}
