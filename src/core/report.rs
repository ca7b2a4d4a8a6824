//! Fingerprint report generation.

use crate::collector::Category;
use crate::core::scoring::known;
use crate::core::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Snapshot keys that are metadata rather than collected data.
const METADATA_KEYS: usize = 3;

pub const REC_CANVAS_BLOCKER: &str = "Consider using a canvas fingerprinting blocker";
pub const REC_AUDIO_BLOCKER: &str = "Consider using an audio fingerprinting blocker";
pub const REC_LIMIT_FONTS: &str = "Consider limiting font enumeration";
pub const REC_DISABLE_PLUGINS: &str = "Consider disabling unnecessary browser plugins";
pub const REC_PRIVACY_EXTENSIONS: &str = "Consider using privacy-focused browser extensions";

/// Qualitative band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// Band of a privacy score: `High` from 80, `Medium` from 50.
    pub fn for_privacy(score: u8) -> Self {
        match score {
            80.. => Level::High,
            50..=79 => Level::Medium,
            _ => Level::Low,
        }
    }

    /// Band of a uniqueness score: `Low` up to 20, `Medium` up to 60.
    pub fn for_uniqueness(score: u8) -> Self {
        match score {
            0..=20 => Level::Low,
            21..=60 => Level::Medium,
            _ => Level::High,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        };
        f.write_str(label)
    }
}

/// Privacy protections that appear to be active on the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyFeatures {
    pub canvas_blocked: bool,
    pub audio_blocked: bool,
    pub fonts_limited: bool,
    pub plugins_limited: bool,
    pub graphics_blocked: bool,
    pub do_not_track: bool,
    /// Heuristic from the storage probe; false positives and negatives are
    /// both common. Not authoritative.
    pub private_mode: bool,
}

impl PrivacyFeatures {
    pub fn detect(snapshot: &Snapshot) -> Self {
        Self {
            canvas_blocked: !known(&snapshot.graphics.canvas_fingerprint),
            audio_blocked: !known(&snapshot.audio.audio_fingerprint),
            fonts_limited: snapshot.fonts.font_count < 10,
            plugins_limited: snapshot.plugins.plugin_count < 3,
            graphics_blocked: !snapshot.graphics.supported,
            do_not_track: snapshot.browser.do_not_track.as_deref() == Some("1"),
            private_mode: snapshot.storage.storage_probe_failed,
        }
    }
}

/// Field counts per category plus the overall total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoints {
    pub total: usize,
    pub categories: BTreeMap<Category, usize>,
}

impl DataPoints {
    pub fn count(snapshot: &Snapshot) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| (*category, snapshot.category_field_count(*category)))
            .collect();
        Self {
            total: crate::collector::field_count(snapshot).saturating_sub(METADATA_KEYS),
            categories,
        }
    }
}

/// Derived view over one scored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintReport {
    pub fingerprint: String,
    pub privacy_score: u8,
    pub uniqueness_score: u8,
    pub privacy_level: Level,
    pub uniqueness_level: Level,
    pub recommendations: Vec<String>,
    pub privacy_features: PrivacyFeatures,
    pub data_points: DataPoints,
    pub timestamp: DateTime<Utc>,
}

impl FingerprintReport {
    /// Build the report of a snapshot.
    ///
    /// An unscored snapshot is scored first, so the levels and
    /// recommendations always come from computed scores.
    pub fn from_snapshot(snapshot: &Snapshot, generated_at: DateTime<Utc>) -> Self {
        let snapshot = if snapshot.is_scored() {
            Cow::Borrowed(snapshot)
        } else {
            Cow::Owned(snapshot.clone().scored())
        };
        let fingerprint = snapshot.fingerprint.clone().unwrap_or_default();

        Self {
            fingerprint,
            privacy_score: snapshot.privacy_score,
            uniqueness_score: snapshot.uniqueness_score,
            privacy_level: Level::for_privacy(snapshot.privacy_score),
            uniqueness_level: Level::for_uniqueness(snapshot.uniqueness_score),
            recommendations: recommendations(&snapshot),
            privacy_features: PrivacyFeatures::detect(&snapshot),
            data_points: DataPoints::count(&snapshot),
            timestamp: generated_at,
        }
    }
}

/// Build a report stamped with the current time.
pub fn generate_report(snapshot: &Snapshot) -> FingerprintReport {
    FingerprintReport::from_snapshot(snapshot, Utc::now())
}

/// Recommendations for the triggered conditions, in priority order.
pub fn recommendations(snapshot: &Snapshot) -> Vec<String> {
    let rules: [(bool, &str); 5] = [
        (known(&snapshot.graphics.canvas_fingerprint), REC_CANVAS_BLOCKER),
        (known(&snapshot.audio.audio_fingerprint), REC_AUDIO_BLOCKER),
        (snapshot.fonts.font_count > 15, REC_LIMIT_FONTS),
        (snapshot.plugins.plugin_count > 5, REC_DISABLE_PLUGINS),
        (snapshot.privacy_score < 50, REC_PRIVACY_EXTENSIONS),
    ];
    rules
        .into_iter()
        .filter(|(triggered, _)| *triggered)
        .map(|(_, text)| text.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_709_294_400, 0).unwrap_or_default()
    }

    #[test]
    fn test_levels() {
        assert_eq!(Level::for_privacy(100), Level::High);
        assert_eq!(Level::for_privacy(80), Level::High);
        assert_eq!(Level::for_privacy(79), Level::Medium);
        assert_eq!(Level::for_privacy(50), Level::Medium);
        assert_eq!(Level::for_privacy(49), Level::Low);

        assert_eq!(Level::for_uniqueness(0), Level::Low);
        assert_eq!(Level::for_uniqueness(20), Level::Low);
        assert_eq!(Level::for_uniqueness(21), Level::Medium);
        assert_eq!(Level::for_uniqueness(60), Level::Medium);
        assert_eq!(Level::for_uniqueness(61), Level::High);
    }

    #[test]
    fn test_no_recommendations_for_private_host() {
        let snapshot = Snapshot {
            privacy_score: 100,
            ..Snapshot::default()
        };
        assert!(recommendations(&snapshot).is_empty());
    }

    #[test]
    fn test_all_recommendations_in_order() {
        let mut snapshot = Snapshot::default();
        snapshot.graphics.canvas_fingerprint = Some("x".to_string());
        snapshot.audio.audio_fingerprint = Some("y".to_string());
        snapshot.fonts.font_count = 16;
        snapshot.plugins.plugin_count = 6;
        snapshot.privacy_score = 49;
        assert_eq!(
            recommendations(&snapshot),
            vec![
                REC_CANVAS_BLOCKER,
                REC_AUDIO_BLOCKER,
                REC_LIMIT_FONTS,
                REC_DISABLE_PLUGINS,
                REC_PRIVACY_EXTENSIONS
            ]
        );
    }

    #[test]
    fn test_recommendation_thresholds_are_strict() {
        let mut snapshot = Snapshot::default();
        snapshot.fonts.font_count = 15;
        snapshot.plugins.plugin_count = 5;
        snapshot.privacy_score = 50;
        assert!(recommendations(&snapshot).is_empty());
    }

    #[test]
    fn test_privacy_features() {
        let mut snapshot = Snapshot::default();
        snapshot.browser.do_not_track = Some("1".to_string());
        snapshot.storage.storage_probe_failed = true;
        snapshot.plugins.plugin_count = 3;
        let features = PrivacyFeatures::detect(&snapshot);
        assert!(features.canvas_blocked);
        assert!(features.audio_blocked);
        assert!(features.fonts_limited);
        assert!(!features.plugins_limited);
        assert!(features.graphics_blocked);
        assert!(features.do_not_track);
        assert!(features.private_mode);

        snapshot.browser.do_not_track = Some("unspecified".to_string());
        assert!(!PrivacyFeatures::detect(&snapshot).do_not_track);
    }

    #[test]
    fn test_data_points() {
        let points = DataPoints::count(&Snapshot::default());
        assert_eq!(points.categories.len(), Category::ALL.len());
        assert_eq!(points.categories[&Category::Features], 17);
        assert_eq!(points.categories[&Category::Browser], 8);
        // 20 categories + 5 metadata keys, minus 3
        assert_eq!(points.total, 22);
    }

    #[test]
    fn test_report_uses_attached_values() {
        let snapshot = Snapshot {
            fingerprint: Some("token".to_string()),
            privacy_score: 45,
            uniqueness_score: 70,
            ..Snapshot::default()
        };
        let report = FingerprintReport::from_snapshot(&snapshot, at());
        assert_eq!(report.fingerprint, "token");
        assert_eq!(report.privacy_level, Level::Low);
        assert_eq!(report.uniqueness_level, Level::High);
        assert_eq!(report.recommendations, vec![REC_PRIVACY_EXTENSIONS]);
        assert_eq!(report.timestamp, at());
    }

    #[test]
    fn test_empty_fingerprints_count_as_blocked() {
        let mut snapshot = Snapshot::default();
        snapshot.graphics.canvas_fingerprint = Some(String::new());
        snapshot.audio.audio_fingerprint = Some(String::new());
        let snapshot = snapshot.scored();
        assert_eq!(snapshot.privacy_score, 100);
        assert_eq!(snapshot.uniqueness_score, 0);

        let report = FingerprintReport::from_snapshot(&snapshot, at());
        assert!(report.recommendations.is_empty());
        assert!(report.privacy_features.canvas_blocked);
        assert!(report.privacy_features.audio_blocked);
    }

    #[test]
    fn test_unscored_snapshot_is_scored_for_report() {
        let mut snapshot = Snapshot::default();
        snapshot.graphics.canvas_fingerprint = Some("abc".to_string());
        assert!(!snapshot.is_scored());

        let report = FingerprintReport::from_snapshot(&snapshot, at());
        let scored = snapshot.scored();
        assert_eq!(report.privacy_score, 90);
        assert_eq!(report.uniqueness_score, 25);
        assert_eq!(Some(report.fingerprint.clone()), scored.fingerprint);
        assert_eq!(report.privacy_level, Level::High);
        assert_eq!(report.recommendations, vec![REC_CANVAS_BLOCKER]);
        assert_eq!(report, FingerprintReport::from_snapshot(&scored, at()));
    }

    #[test]
    fn test_report_is_pure() {
        let snapshot = Snapshot::default().scored();
        assert_eq!(
            FingerprintReport::from_snapshot(&snapshot, at()),
            FingerprintReport::from_snapshot(&snapshot, at())
        );
    }

    #[test]
    fn test_report_wire_format() {
        let report = FingerprintReport::from_snapshot(&Snapshot::default().scored(), at());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["privacyLevel"], "High");
        assert_eq!(json["uniquenessLevel"], "Low");
        assert_eq!(json["dataPoints"]["categories"]["features"], 17);
        assert_eq!(json["privacyFeatures"]["canvasBlocked"], true);
    }
}
