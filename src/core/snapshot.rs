//! Snapshot aggregation.
//!
//! A [`Snapshot`] is the union of every category record from one collection
//! pass. It is built fresh per pass, scored once, and never mutated after
//! that.

use crate::collector::{
    self, field_count, AudioRecord, BrowserRecord, CanvasRecord, Category, DeviceRecord,
    FeatureRecord, FontRecord, GraphicsRecord, HardwareRecord, LocationRecord, MediaRecord,
    NetworkRecord, PerformanceRecord, PermissionRecord, PluginRecord, ScreenRecord,
    SecurityRecord, SensorRecord, StorageRecord, TimeRecord, WindowRecord,
};
use crate::core::fingerprint::generate_fingerprint;
use crate::core::report::FingerprintReport;
use crate::core::scoring::{privacy_score, uniqueness_score};
use crate::env::EnvironmentProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random suffix of a session identifier.
const SESSION_SUFFIX_LEN: usize = 9;

/// One complete capture of the host's capabilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub browser: BrowserRecord,
    pub screen: ScreenRecord,
    pub window: WindowRecord,
    pub location: LocationRecord,
    pub time: TimeRecord,
    pub graphics: GraphicsRecord,
    pub audio: AudioRecord,
    pub network: NetworkRecord,
    pub storage: StorageRecord,
    pub permissions: PermissionRecord,
    pub hardware: HardwareRecord,
    pub sensors: SensorRecord,
    pub performance: PerformanceRecord,
    pub security: SecurityRecord,
    pub features: FeatureRecord,
    pub fonts: FontRecord,
    pub plugins: PluginRecord,
    pub canvas: CanvasRecord,
    pub media: MediaRecord,
    pub device: DeviceRecord,
    pub collected_at: DateTime<Utc>,
    pub session_id: String,
    /// Set by [`Snapshot::scored`]
    pub fingerprint: Option<String>,
    pub privacy_score: u8,
    pub uniqueness_score: u8,
}

impl Snapshot {
    /// Attach the fingerprint and both scores.
    ///
    /// Consumes the snapshot so a scored snapshot cannot be confused with
    /// the unscored one it was built from.
    pub fn scored(self) -> Self {
        let fingerprint = generate_fingerprint(&self);
        let privacy = privacy_score(&self);
        let uniqueness = uniqueness_score(&self);
        Self {
            fingerprint: Some(fingerprint),
            privacy_score: privacy,
            uniqueness_score: uniqueness,
            ..self
        }
    }

    pub fn is_scored(&self) -> bool {
        self.fingerprint.is_some()
    }

    /// Number of fields the record of `category` declares.
    pub fn category_field_count(&self, category: Category) -> usize {
        match category {
            Category::Browser => field_count(&self.browser),
            Category::Screen => field_count(&self.screen),
            Category::Window => field_count(&self.window),
            Category::Location => field_count(&self.location),
            Category::Time => field_count(&self.time),
            Category::Graphics => field_count(&self.graphics),
            Category::Audio => field_count(&self.audio),
            Category::Network => field_count(&self.network),
            Category::Storage => field_count(&self.storage),
            Category::Permissions => field_count(&self.permissions),
            Category::Hardware => field_count(&self.hardware),
            Category::Sensors => field_count(&self.sensors),
            Category::Performance => field_count(&self.performance),
            Category::Security => field_count(&self.security),
            Category::Features => field_count(&self.features),
            Category::Fonts => field_count(&self.fonts),
            Category::Plugins => field_count(&self.plugins),
            Category::Canvas => field_count(&self.canvas),
            Category::Media => field_count(&self.media),
            Category::Device => field_count(&self.device),
        }
    }
}

/// The identity, display and time subset of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSnapshot {
    pub browser: BrowserRecord,
    pub screen: ScreenRecord,
    pub window: WindowRecord,
    pub location: LocationRecord,
    pub time: TimeRecord,
    pub collected_at: DateTime<Utc>,
}

/// Build a session identifier: millisecond timestamp plus a random suffix.
///
/// Unique by convention only. The suffix is not a secret.
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let suffix: String = to_base36(Uuid::new_v4().as_u128())
        .chars()
        .take(SESSION_SUFFIX_LEN)
        .collect();
    format!("{}-{}", now.timestamp_millis(), suffix)
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Collect the basic identity subset. Synchronous.
pub fn collect_basic(env: &dyn EnvironmentProvider) -> BasicSnapshot {
    BasicSnapshot {
        browser: collector::collect_browser(env),
        screen: collector::collect_screen(env),
        window: collector::collect_window(env),
        location: collector::collect_location(env),
        time: collector::collect_time(env),
        collected_at: env.now(),
    }
}

/// Run every collector and merge the records into an unscored snapshot.
///
/// Permission queries are the only suspension point and run as one
/// batched step after the synchronous collectors.
pub async fn collect_snapshot(env: &dyn EnvironmentProvider) -> Snapshot {
    let collected_at = env.now();
    let session_id = generate_session_id(collected_at);
    tracing::debug!(%session_id, "collection pass started");

    let mut snapshot = Snapshot {
        browser: collector::collect_browser(env),
        screen: collector::collect_screen(env),
        window: collector::collect_window(env),
        location: collector::collect_location(env),
        time: collector::collect_time(env),
        graphics: collector::collect_graphics(env),
        audio: collector::collect_audio(env),
        network: collector::collect_network(env),
        storage: collector::collect_storage(env),
        permissions: PermissionRecord::default(),
        hardware: collector::collect_hardware(env),
        sensors: collector::collect_sensors(env),
        performance: collector::collect_performance(env),
        security: collector::collect_security(env),
        features: collector::collect_features(env),
        fonts: collector::collect_fonts(env),
        plugins: collector::collect_plugins(env),
        canvas: collector::collect_canvas(env),
        media: collector::collect_media(env),
        device: collector::collect_device(env),
        collected_at,
        session_id,
        fingerprint: None,
        privacy_score: 0,
        uniqueness_score: 0,
    };
    snapshot.permissions = collector::collect_permissions(env).await;
    snapshot
}

/// Collect a full snapshot, score it, and build its report.
pub async fn collect_and_score(env: &dyn EnvironmentProvider) -> (Snapshot, FingerprintReport) {
    let snapshot = collect_snapshot(env).await.scored();
    let report = FingerprintReport::from_snapshot(&snapshot, env.now());
    tracing::info!(
        session_id = %snapshot.session_id,
        privacy_score = snapshot.privacy_score,
        uniqueness_score = snapshot.uniqueness_score,
        "collection pass complete"
    );
    (snapshot, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fixtures;

    #[test]
    fn test_session_id_format() {
        let now = fixtures::bare().now();
        let id = generate_session_id(now);
        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, now.timestamp_millis().to_string());
        assert!(!suffix.is_empty() && suffix.len() <= SESSION_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_session_ids_differ() {
        let now = fixtures::bare().now();
        assert_ne!(generate_session_id(now), generate_session_id(now));
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_basic_snapshot() {
        let env = fixtures::desktop();
        let basic = collect_basic(&env);
        assert_eq!(basic.screen.width, Some(2560));
        assert_eq!(basic.collected_at, env.now());
        assert_eq!(basic.time.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[tokio::test]
    async fn test_aggregator_leaves_scores_unset() {
        let snapshot = collect_snapshot(&fixtures::desktop()).await;
        assert_eq!(snapshot.fingerprint, None);
        assert_eq!(snapshot.privacy_score, 0);
        assert_eq!(snapshot.uniqueness_score, 0);
        assert!(!snapshot.is_scored());
        assert_eq!(snapshot.fonts.font_count, 7);
        assert_eq!(snapshot.permissions.microphone, Some(crate::env::PermissionState::Granted));
    }

    #[tokio::test]
    async fn test_scored_snapshot() {
        let snapshot = collect_snapshot(&fixtures::desktop()).await.scored();
        assert!(snapshot.is_scored());
        assert_eq!(snapshot.fingerprint.as_ref().map(String::len), Some(32));
        assert!(snapshot.privacy_score < 100);
        assert!(snapshot.uniqueness_score > 0);
    }

    #[tokio::test]
    async fn test_every_category_key_is_present() {
        let snapshot = collect_snapshot(&fixtures::bare()).await;
        let json = serde_json::to_value(&snapshot).unwrap();
        for category in Category::ALL {
            assert!(json.get(category.as_str()).is_some(), "missing {category}");
        }
        for key in ["collectedAt", "sessionId", "fingerprint", "privacyScore", "uniquenessScore"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn test_category_field_count_matches_json() {
        let snapshot = collect_snapshot(&fixtures::desktop()).await;
        let json = serde_json::to_value(&snapshot).unwrap();
        for category in Category::ALL {
            let keys = json[category.as_str()].as_object().unwrap().len();
            assert_eq!(snapshot.category_field_count(category), keys);
        }
    }
}
