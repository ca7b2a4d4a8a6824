//! Aggregation, fingerprinting, scoring and reporting.
//!
//! - [`snapshot`]: runs the collectors and merges their records
//! - [`fingerprint`]: canonical field selection and token encoding
//! - [`scoring`]: privacy and uniqueness scores from one signal table
//! - [`report`]: levels, recommendations and data-point counts

pub mod fingerprint;
pub mod report;
pub mod scoring;
pub mod snapshot;

pub use fingerprint::{canonical_string, generate_fingerprint, similarity, FINGERPRINT_LEN};
pub use report::{generate_report, DataPoints, FingerprintReport, Level, PrivacyFeatures};
pub use scoring::{privacy_score, uniqueness_score, Signal, SIGNALS};
pub use snapshot::{
    collect_and_score, collect_basic, collect_snapshot, generate_session_id, BasicSnapshot,
    Snapshot,
};
