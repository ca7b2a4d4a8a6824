//! Capability records, one fixed-shape struct per probe category.
//!
//! Absent values serialize as `null` and empty lists as `[]`, so every
//! declared key is present in the JSON form of a record regardless of
//! what the host supports.

use crate::env::{MimeTypeInfo, PermissionState, PluginInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Probe categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Browser,
    Screen,
    Window,
    Location,
    Time,
    Graphics,
    Audio,
    Network,
    Storage,
    Permissions,
    Hardware,
    Sensors,
    Performance,
    Security,
    Features,
    Fonts,
    Plugins,
    Canvas,
    Media,
    Device,
}

impl Category {
    pub const ALL: [Category; 20] = [
        Category::Browser,
        Category::Screen,
        Category::Window,
        Category::Location,
        Category::Time,
        Category::Graphics,
        Category::Audio,
        Category::Network,
        Category::Storage,
        Category::Permissions,
        Category::Hardware,
        Category::Sensors,
        Category::Performance,
        Category::Security,
        Category::Features,
        Category::Fonts,
        Category::Plugins,
        Category::Canvas,
        Category::Media,
        Category::Device,
    ];

    /// Key of the category in a serialized snapshot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Browser => "browser",
            Category::Screen => "screen",
            Category::Window => "window",
            Category::Location => "location",
            Category::Time => "time",
            Category::Graphics => "graphics",
            Category::Audio => "audio",
            Category::Network => "network",
            Category::Storage => "storage",
            Category::Permissions => "permissions",
            Category::Hardware => "hardware",
            Category::Sensors => "sensors",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::Features => "features",
            Category::Fonts => "fonts",
            Category::Plugins => "plugins",
            Category::Canvas => "canvas",
            Category::Media => "media",
            Category::Device => "device",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of keys in the JSON object form of a record.
pub fn field_count<T: Serialize>(record: &T) -> usize {
    serde_json::to_value(record)
        .ok()
        .and_then(|value| value.as_object().map(|object| object.len()))
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserRecord {
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    pub do_not_track: Option<String>,
    pub on_line: bool,
    pub platform: Option<String>,
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRecord {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub avail_width: Option<u32>,
    pub avail_height: Option<u32>,
    pub color_depth: Option<u32>,
    pub pixel_depth: Option<u32>,
    pub orientation: Option<String>,
}

impl ScreenRecord {
    /// Whether the display exceeds 1920x1080 in either dimension.
    pub fn is_large(&self) -> bool {
        self.width.is_some_and(|w| w > 1920) || self.height.is_some_and(|h| h > 1080)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    pub inner_width: Option<u32>,
    pub inner_height: Option<u32>,
    pub outer_width: Option<u32>,
    pub outer_height: Option<u32>,
    pub device_pixel_ratio: Option<f64>,
    pub screen_x: Option<i32>,
    pub screen_y: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub href: Option<String>,
    pub origin: Option<String>,
    pub protocol: Option<String>,
    pub host: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<String>,
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    /// IANA timezone name
    pub timezone: Option<String>,
    /// Minutes from local time to UTC (positive west of Greenwich)
    pub timezone_offset: Option<i32>,
    pub current_time: DateTime<Utc>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicsRecord {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
    pub version: Option<String>,
    pub shading_language_version: Option<String>,
    pub extensions: Vec<String>,
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Encoded raster of the fixed drawing probe
    pub canvas_fingerprint: Option<String>,
    pub supported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRecord {
    pub context_supported: bool,
    pub sample_rate: Option<f64>,
    pub channel_count: Option<u32>,
    pub audio_fingerprint: Option<String>,
    pub audio_worklet_supported: bool,
    pub media_session_supported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub connection_type: Option<String>,
    pub effective_type: Option<String>,
    pub downlink: Option<f64>,
    pub rtt: Option<f64>,
    pub save_data: Option<bool>,
    pub on_line: bool,
    #[serde(rename = "webRTCSupported")]
    pub web_rtc_supported: bool,
    /// Never populated; ICE candidate harvesting is not performed
    #[serde(rename = "localIP")]
    pub local_ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRecord {
    pub local_storage: bool,
    pub session_storage: bool,
    #[serde(rename = "indexedDB")]
    pub indexed_db: bool,
    #[serde(rename = "webSQL")]
    pub web_sql: bool,
    #[serde(rename = "cacheAPI")]
    pub cache_api: bool,
    pub quota: Option<u64>,
    pub usage: Option<u64>,
    /// Opening a throwaway database threw. Low-confidence private-mode hint.
    pub storage_probe_failed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    pub geolocation: Option<PermissionState>,
    pub notifications: Option<PermissionState>,
    pub camera: Option<PermissionState>,
    pub microphone: Option<PermissionState>,
    pub clipboard: Option<PermissionState>,
    pub midi: Option<PermissionState>,
    pub persistent_storage: Option<PermissionState>,
    pub push: Option<PermissionState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareRecord {
    pub hardware_concurrency: Option<u32>,
    /// GiB, as coarsened by the host
    pub device_memory: Option<f64>,
    pub max_touch_points: Option<u32>,
    pub pointer_support: bool,
    pub gamepad_support: bool,
    pub vibration_support: bool,
    pub battery_supported: bool,
    pub battery_level: Option<f64>,
    pub battery_charging: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRecord {
    pub ambient_light_sensor: bool,
    pub proximity_sensor: bool,
    pub gyroscope: bool,
    pub accelerometer: bool,
    pub magnetometer: bool,
    pub absolute_orientation: bool,
    pub relative_orientation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub navigation_timing: Option<BTreeMap<String, f64>>,
    pub memory_info: Option<BTreeMap<String, f64>>,
    pub resource_timing: bool,
    pub performance_observer: bool,
    pub user_timing: bool,
    pub mark_support: bool,
    pub measure_support: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRecord {
    pub content_security_policy: Option<String>,
    pub feature_policy: Option<String>,
    pub referrer_policy: Option<String>,
    pub permissions_policy: Option<String>,
    pub secure_context: bool,
    pub cross_origin_isolated: bool,
    pub is_secure_context: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    pub service_worker: bool,
    pub push_notifications: bool,
    pub web_share: bool,
    pub web_bluetooth: bool,
    #[serde(rename = "webUSB")]
    pub web_usb: bool,
    #[serde(rename = "webMIDI")]
    pub web_midi: bool,
    pub web_serial: bool,
    #[serde(rename = "webHID")]
    pub web_hid: bool,
    #[serde(rename = "presentationAPI")]
    pub presentation_api: bool,
    pub wake_lock: bool,
    pub screen_wake_lock: bool,
    #[serde(rename = "clipboardAPI")]
    pub clipboard_api: bool,
    pub payment_request: bool,
    pub credential_management: bool,
    pub web_authn: bool,
    pub trusted_types: bool,
    #[serde(rename = "reportingAPI")]
    pub reporting_api: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontRecord {
    /// Detected fonts, in reference-list order
    pub available_fonts: Vec<String>,
    pub font_count: usize,
    /// Sorted, comma-joined detected font names; absent when none detected
    pub font_fingerprint: Option<String>,
    pub font_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRecord {
    pub plugins: Vec<PluginInfo>,
    pub plugin_count: usize,
    pub mime_types: Vec<MimeTypeInfo>,
    pub mime_type_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRecord {
    #[serde(rename = "canvas2D")]
    pub canvas_2d: bool,
    #[serde(rename = "canvasWebGL")]
    pub canvas_webgl: bool,
    #[serde(rename = "canvasWebGL2")]
    pub canvas_webgl2: bool,
    pub canvas_bitmap_renderer: bool,
    pub canvas_image_bitmap: bool,
    pub canvas_offscreen: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub media_devices: bool,
    pub get_user_media: bool,
    pub media_recorder: bool,
    pub media_source: bool,
    pub media_session: bool,
    pub web_codecs: bool,
    #[serde(rename = "webRTC")]
    pub web_rtc: bool,
    pub peer_connection: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub device_pixel_ratio: Option<f64>,
    pub color_depth: Option<u32>,
    pub pixel_depth: Option<u32>,
    pub screen_orientation: Option<String>,
    pub device_orientation: bool,
    pub device_motion: bool,
    pub max_touch_points: u32,
    pub touch_support: bool,
    pub pointer_support: bool,
    pub hover_support: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let json = serde_json::to_value(ScreenRecord::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 7);
        assert!(object["width"].is_null());
        assert!(object["orientation"].is_null());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(StorageRecord::default()).unwrap();
        for key in ["localStorage", "indexedDB", "webSQL", "cacheAPI", "storageProbeFailed"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }

        let json = serde_json::to_value(CanvasRecord::default()).unwrap();
        assert!(json.get("canvas2D").is_some());
        assert!(json.get("canvasWebGL2").is_some());
    }

    #[test]
    fn test_field_counts() {
        assert_eq!(field_count(&BrowserRecord::default()), 8);
        assert_eq!(field_count(&GraphicsRecord::default()), 8);
        assert_eq!(field_count(&FeatureRecord::default()), 17);
        assert_eq!(field_count(&DeviceRecord::default()), 10);
        assert_eq!(field_count(&"not an object"), 0);
    }

    #[test]
    fn test_large_screen() {
        let mut screen = ScreenRecord::default();
        assert!(!screen.is_large());
        screen.width = Some(1920);
        screen.height = Some(1080);
        assert!(!screen.is_large());
        screen.height = Some(1200);
        assert!(screen.is_large());
    }

    #[test]
    fn test_category_keys() {
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.as_str());
        }
    }
}
