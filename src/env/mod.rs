//! Host environment abstraction for the probe.
//!
//! Every collector reads the host exclusively through [`EnvironmentProvider`].
//! A provider answers capability queries with a typed value or a
//! [`ProbeError`]; collectors turn errors into explicit absence so a single
//! missing capability never aborts a collection pass.
//!
//! Two providers ship with the crate:
//! - [`HostProfile`]: a host described by a JSON document (captured from a
//!   browser, or hand-written for tests)
//! - `NativeEnvironment` (feature `native`): the machine the binary runs on

pub mod profile;

#[cfg(feature = "native")]
pub mod native;

#[cfg(test)]
pub(crate) mod fixtures;

pub use profile::HostProfile;

#[cfg(feature = "native")]
pub use native::NativeEnvironment;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure of a single host query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The host does not implement the capability at all.
    #[error("capability not supported by host: {0}")]
    Unsupported(&'static str),

    /// The host implements the capability but the query failed.
    #[error("host rejected query: {0}")]
    Rejected(String),
}

/// Navigator-level identity values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorInfo {
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    pub do_not_track: Option<String>,
    pub on_line: bool,
    pub platform: Option<String>,
    pub vendor: Option<String>,
    pub hardware_concurrency: Option<u32>,
    pub device_memory: Option<f64>,
    pub max_touch_points: Option<u32>,
}

/// Physical display metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
    pub color_depth: u32,
    pub pixel_depth: u32,
    /// Orientation type, e.g. `landscape-primary`
    pub orientation: Option<String>,
}

/// Window (viewport) metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportInfo {
    pub inner_width: u32,
    pub inner_height: u32,
    pub outer_width: u32,
    pub outer_height: u32,
    pub device_pixel_ratio: f64,
    pub screen_x: i32,
    pub screen_y: i32,
}

/// Document location components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationInfo {
    pub href: String,
    pub origin: String,
    pub protocol: String,
    pub host: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

/// Values read from a 3D graphics context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsInfo {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
    pub version: Option<String>,
    pub shading_language_version: Option<String>,
    pub extensions: Vec<String>,
    /// Context limit parameters keyed by their GL constant name
    pub parameters: BTreeMap<String, serde_json::Value>,
}

/// Values read from an audio context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioInfo {
    pub sample_rate: f64,
    pub channel_count: u32,
    pub max_channel_count: u32,
    pub audio_worklet: bool,
}

/// Network connection hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionInfo {
    pub connection_type: Option<String>,
    pub effective_type: Option<String>,
    pub downlink: Option<f64>,
    pub rtt: Option<f64>,
    pub save_data: Option<bool>,
}

/// Storage quota estimate in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEstimate {
    pub quota: u64,
    pub usage: u64,
}

/// Battery state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryInfo {
    /// Charge level in 0.0..=1.0
    pub level: f64,
    pub charging: bool,
}

/// Secure-context flags of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    pub secure_context: bool,
    pub cross_origin_isolated: bool,
}

/// An installed plugin entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub filename: String,
    /// Number of MIME types the plugin handles
    pub length: u32,
}

/// A registered MIME type entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MimeTypeInfo {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub description: String,
    pub suffixes: String,
    /// Name of the plugin handling this type
    pub enabled_plugin: Option<String>,
}

/// Rendered box of a text measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
}

/// Policy values that documents declare through meta tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMeta {
    ContentSecurityPolicy,
    FeaturePolicy,
    Referrer,
    PermissionsPolicy,
}

/// Permissions the probe queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionName {
    Geolocation,
    Notifications,
    Camera,
    Microphone,
    ClipboardRead,
    Midi,
    PersistentStorage,
    Push,
}

impl PermissionName {
    /// Name as understood by the host permission registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionName::Geolocation => "geolocation",
            PermissionName::Notifications => "notifications",
            PermissionName::Camera => "camera",
            PermissionName::Microphone => "microphone",
            PermissionName::ClipboardRead => "clipboard-read",
            PermissionName::Midi => "midi",
            PermissionName::PersistentStorage => "persistent-storage",
            PermissionName::Push => "push",
        }
    }
}

/// State reported by a permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// Drawing context kinds a canvas element can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    #[serde(rename = "2d")]
    TwoD,
    Webgl,
    Webgl2,
    BitmapRenderer,
}

/// Host APIs whose mere presence is a capability signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostApi {
    // storage
    LocalStorage,
    SessionStorage,
    IndexedDb,
    WebSql,
    CacheStorage,
    // network
    RtcPeerConnection,
    NetworkInformation,
    // hardware
    PointerEvents,
    Gamepads,
    Vibration,
    Battery,
    // sensors
    AmbientLightSensor,
    ProximitySensor,
    Gyroscope,
    Accelerometer,
    Magnetometer,
    AbsoluteOrientationSensor,
    RelativeOrientationSensor,
    // performance
    PerformanceEntries,
    PerformanceObserver,
    PerformanceMark,
    PerformanceMeasure,
    // platform features
    ServiceWorker,
    PushManager,
    WebShare,
    WebBluetooth,
    WebUsb,
    WebMidi,
    WebSerial,
    WebHid,
    Presentation,
    WakeLock,
    Clipboard,
    PaymentRequest,
    Credentials,
    PublicKeyCredential,
    TrustedTypes,
    ReportingObserver,
    // canvas
    CreateImageBitmap,
    OffscreenCanvas,
    // media
    MediaDevices,
    GetUserMedia,
    MediaRecorder,
    MediaSource,
    MediaSession,
    VideoEncoder,
    // device
    DeviceOrientationEvent,
    DeviceMotionEvent,
    TouchEvents,
}

/// An off-screen 2D raster surface.
///
/// Dropping the surface releases it; nothing stays attached to the host.
pub trait RasterSurface {
    fn set_text_baseline(&mut self, baseline: &str);
    fn set_font(&mut self, font: &str);
    fn set_fill_style(&mut self, style: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Serialize the current raster to an encoded data URL.
    fn to_data_url(&self) -> Result<String, ProbeError>;
}

/// A hidden text element used to measure rendered text.
///
/// The element is removed from the host when the probe is dropped.
pub trait TextProbe {
    /// Measure the probe text rendered with a CSS font-family stack.
    fn measure(&mut self, font_family: &str) -> Result<TextBox, ProbeError>;
}

/// Read-only view of a host runtime's introspectable capabilities.
///
/// Every method has a default that reports the capability as unsupported,
/// so partial hosts implement only what they expose.
#[async_trait]
pub trait EnvironmentProvider: Send + Sync {
    /// Current time as seen by the host.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn navigator(&self) -> Result<NavigatorInfo, ProbeError> {
        Err(ProbeError::Unsupported("navigator"))
    }

    fn screen(&self) -> Result<ScreenInfo, ProbeError> {
        Err(ProbeError::Unsupported("screen"))
    }

    fn viewport(&self) -> Result<ViewportInfo, ProbeError> {
        Err(ProbeError::Unsupported("window"))
    }

    fn location(&self) -> Result<LocationInfo, ProbeError> {
        Err(ProbeError::Unsupported("location"))
    }

    /// IANA timezone name resolved by the host.
    fn timezone(&self) -> Result<String, ProbeError> {
        Err(ProbeError::Unsupported("Intl.DateTimeFormat"))
    }

    /// Whether a presence-checked API exists on the host.
    fn has_api(&self, _api: HostApi) -> bool {
        false
    }

    /// Whether a canvas element hands out the given context kind.
    fn context_supported(&self, _kind: ContextKind) -> bool {
        false
    }

    /// Open a 3D context and read its identity and limits.
    fn graphics_context(&self) -> Result<GraphicsInfo, ProbeError> {
        Err(ProbeError::Unsupported("webgl"))
    }

    /// Create a transient off-screen 2D surface.
    fn raster_surface(&self, _width: u32, _height: u32) -> Result<Box<dyn RasterSurface>, ProbeError> {
        Err(ProbeError::Unsupported("canvas 2d"))
    }

    /// Create a transient audio context.
    fn audio_context(&self) -> Result<AudioInfo, ProbeError> {
        Err(ProbeError::Unsupported("AudioContext"))
    }

    fn connection(&self) -> Result<ConnectionInfo, ProbeError> {
        Err(ProbeError::Unsupported("navigator.connection"))
    }

    fn storage_estimate(&self) -> Result<StorageEstimate, ProbeError> {
        Err(ProbeError::Unsupported("StorageManager"))
    }

    /// Open (and discard) a throwaway database.
    fn probe_storage(&self) -> Result<(), ProbeError> {
        Err(ProbeError::Unsupported("indexedDB"))
    }

    fn battery(&self) -> Result<BatteryInfo, ProbeError> {
        Err(ProbeError::Unsupported("getBattery"))
    }

    fn navigation_timing(&self) -> Result<BTreeMap<String, f64>, ProbeError> {
        Err(ProbeError::Unsupported("performance.timing"))
    }

    fn memory_info(&self) -> Result<BTreeMap<String, f64>, ProbeError> {
        Err(ProbeError::Unsupported("performance.memory"))
    }

    /// Content of a policy meta tag, `None` when the document declares none.
    fn policy_meta(&self, _policy: PolicyMeta) -> Result<Option<String>, ProbeError> {
        Err(ProbeError::Unsupported("document"))
    }

    fn security_context(&self) -> Result<SecurityContext, ProbeError> {
        Err(ProbeError::Unsupported("isSecureContext"))
    }

    /// Attach a hidden element rendering `text` at `size_px`.
    fn text_probe(&self, _text: &str, _size_px: u32) -> Result<Box<dyn TextProbe>, ProbeError> {
        Err(ProbeError::Unsupported("text layout"))
    }

    fn plugins(&self) -> Result<Vec<PluginInfo>, ProbeError> {
        Err(ProbeError::Unsupported("navigator.plugins"))
    }

    fn mime_types(&self) -> Result<Vec<MimeTypeInfo>, ProbeError> {
        Err(ProbeError::Unsupported("navigator.mimeTypes"))
    }

    /// Evaluate a CSS media query.
    fn media_query(&self, _query: &str) -> Result<bool, ProbeError> {
        Err(ProbeError::Unsupported("matchMedia"))
    }

    /// Query the state of one permission.
    async fn query_permission(&self, _name: PermissionName) -> Result<PermissionState, ProbeError> {
        Err(ProbeError::Unsupported("navigator.permissions"))
    }
}
