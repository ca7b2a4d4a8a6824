//! Canned host profiles for unit tests.

use super::{
    AudioInfo, BatteryInfo, ConnectionInfo, ContextKind, GraphicsInfo, HostApi, HostProfile,
    LocationInfo, MimeTypeInfo, NavigatorInfo, PermissionName, PermissionState, PluginInfo,
    PolicyMeta, ScreenInfo, SecurityContext, StorageEstimate, ViewportInfo,
};
use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;

/// A fully featured desktop browser host.
pub fn desktop() -> HostProfile {
    let mut parameters = BTreeMap::new();
    parameters.insert("MAX_TEXTURE_SIZE".to_string(), serde_json::json!(16384));
    parameters.insert("MAX_VIEWPORT_DIMS".to_string(), serde_json::json!([32767, 32767]));
    parameters.insert("MAX_VERTEX_ATTRIBS".to_string(), serde_json::json!(16));
    parameters.insert("UNMASKED_VENDOR_WEBGL".to_string(), serde_json::json!("ignored"));

    let mut policies = BTreeMap::new();
    policies.insert(PolicyMeta::Referrer, "strict-origin".to_string());

    let mut permissions = BTreeMap::new();
    permissions.insert(PermissionName::Geolocation, PermissionState::Denied);
    permissions.insert(PermissionName::Notifications, PermissionState::Prompt);
    permissions.insert(PermissionName::Camera, PermissionState::Prompt);
    permissions.insert(PermissionName::Microphone, PermissionState::Granted);

    let mut timing = BTreeMap::new();
    timing.insert("navigationStart".to_string(), 1_700_000_000_000.0);
    timing.insert("responseEnd".to_string(), 1_700_000_000_120.0);

    HostProfile {
        clock: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single(),
        navigator: Some(NavigatorInfo {
            user_agent: Some(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0 Safari/537.36"
                    .to_string(),
            ),
            language: Some("en-US".to_string()),
            languages: vec!["en-US".to_string(), "en".to_string()],
            cookie_enabled: true,
            do_not_track: Some("1".to_string()),
            on_line: true,
            platform: Some("Linux x86_64".to_string()),
            vendor: Some("Google Inc.".to_string()),
            hardware_concurrency: Some(8),
            device_memory: Some(8.0),
            max_touch_points: Some(0),
        }),
        screen: Some(ScreenInfo {
            width: 2560,
            height: 1440,
            avail_width: 2560,
            avail_height: 1400,
            color_depth: 24,
            pixel_depth: 24,
            orientation: Some("landscape-primary".to_string()),
        }),
        viewport: Some(ViewportInfo {
            inner_width: 1280,
            inner_height: 720,
            outer_width: 1280,
            outer_height: 800,
            device_pixel_ratio: 2.0,
            screen_x: 0,
            screen_y: 0,
        }),
        location: Some(LocationInfo {
            href: "https://probe.example/?q=1#top".to_string(),
            origin: "https://probe.example".to_string(),
            protocol: "https:".to_string(),
            host: "probe.example".to_string(),
            hostname: "probe.example".to_string(),
            port: String::new(),
            pathname: "/".to_string(),
            search: "?q=1".to_string(),
            hash: "#top".to_string(),
        }),
        timezone: Some("Europe/Berlin".to_string()),
        apis: [
            HostApi::LocalStorage,
            HostApi::SessionStorage,
            HostApi::IndexedDb,
            HostApi::CacheStorage,
            HostApi::RtcPeerConnection,
            HostApi::NetworkInformation,
            HostApi::PointerEvents,
            HostApi::Gamepads,
            HostApi::Battery,
            HostApi::PerformanceEntries,
            HostApi::PerformanceObserver,
            HostApi::PerformanceMark,
            HostApi::PerformanceMeasure,
            HostApi::ServiceWorker,
            HostApi::PushManager,
            HostApi::Clipboard,
            HostApi::WakeLock,
            HostApi::Credentials,
            HostApi::PublicKeyCredential,
            HostApi::CreateImageBitmap,
            HostApi::OffscreenCanvas,
            HostApi::MediaDevices,
            HostApi::MediaRecorder,
            HostApi::MediaSession,
            HostApi::DeviceOrientationEvent,
        ]
        .into_iter()
        .collect(),
        contexts: [ContextKind::TwoD, ContextKind::Webgl, ContextKind::Webgl2]
            .into_iter()
            .collect(),
        graphics: Some(GraphicsInfo {
            vendor: Some("WebKit".to_string()),
            renderer: Some("WebKit WebGL".to_string()),
            version: Some("WebGL 1.0 (OpenGL ES 2.0 Chromium)".to_string()),
            shading_language_version: Some("WebGL GLSL ES 1.0".to_string()),
            extensions: vec![
                "ANGLE_instanced_arrays".to_string(),
                "OES_texture_float".to_string(),
            ],
            parameters,
        }),
        render_signature: Some("mesa-23.1/freetype-2.13".to_string()),
        audio: Some(AudioInfo {
            sample_rate: 48000.0,
            channel_count: 2,
            max_channel_count: 2,
            audio_worklet: true,
        }),
        connection: Some(ConnectionInfo {
            connection_type: None,
            effective_type: Some("4g".to_string()),
            downlink: Some(10.0),
            rtt: Some(50.0),
            save_data: Some(false),
        }),
        storage_estimate: Some(StorageEstimate {
            quota: 300_000_000_000,
            usage: 1_024,
        }),
        storage_blocked: false,
        battery: Some(BatteryInfo {
            level: 0.8,
            charging: true,
        }),
        navigation_timing: Some(timing),
        memory_info: None,
        policies: Some(policies),
        security: Some(SecurityContext {
            secure_context: true,
            cross_origin_isolated: false,
        }),
        fonts: Some(
            [
                "Arial",
                "Verdana",
                "Helvetica",
                "Times New Roman",
                "Courier New",
                "Georgia",
                "Tahoma",
                "DejaVu Sans",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        ),
        plugins: Some(vec![PluginInfo {
            name: "PDF Viewer".to_string(),
            description: "Portable Document Format".to_string(),
            filename: "internal-pdf-viewer".to_string(),
            length: 1,
        }]),
        mime_types: Some(vec![MimeTypeInfo {
            mime_type: "application/pdf".to_string(),
            description: "Portable Document Format".to_string(),
            suffixes: "pdf".to_string(),
            enabled_plugin: Some("PDF Viewer".to_string()),
        }]),
        hover: Some(true),
        permissions: Some(permissions),
    }
}

/// A host that exposes nothing at all.
pub fn bare() -> HostProfile {
    HostProfile {
        clock: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single(),
        ..HostProfile::default()
    }
}
