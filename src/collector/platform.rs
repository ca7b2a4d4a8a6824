//! Network, storage, hardware, sensor, performance, security and feature
//! collectors. Mostly presence checks against the host.

use super::types::{
    FeatureRecord, HardwareRecord, NetworkRecord, PerformanceRecord, SecurityRecord, SensorRecord,
    StorageRecord,
};
use super::{available, nonzero};
use crate::env::{EnvironmentProvider, HostApi, PolicyMeta, ProbeError};

pub fn collect_network(env: &dyn EnvironmentProvider) -> NetworkRecord {
    let on_line = available("navigator", env.navigator())
        .map(|nav| nav.on_line)
        .unwrap_or(false);
    let connection = available("navigator.connection", env.connection()).unwrap_or_default();

    NetworkRecord {
        connection_type: connection.connection_type.filter(|s| !s.is_empty()),
        effective_type: connection.effective_type.filter(|s| !s.is_empty()),
        downlink: nonzero(connection.downlink),
        rtt: nonzero(connection.rtt),
        save_data: connection.save_data.filter(|flag| *flag),
        on_line,
        web_rtc_supported: env.has_api(HostApi::RtcPeerConnection),
        local_ip: None,
    }
}

/// Storage API presence, quota estimate, and the private-mode storage probe.
///
/// `storage_probe_failed` is only set when the host has the database API
/// and opening a throwaway database throws. It is a heuristic: storage
/// partitioning and quota policies vary by host, so a failure is weak
/// evidence of a private browsing mode, never proof.
pub fn collect_storage(env: &dyn EnvironmentProvider) -> StorageRecord {
    let estimate = available("StorageManager", env.storage_estimate());
    let storage_probe_failed = match env.probe_storage() {
        Ok(()) => false,
        Err(ProbeError::Unsupported(_)) => false,
        Err(err) => {
            tracing::debug!(error = %err, "storage probe threw");
            true
        }
    };

    StorageRecord {
        local_storage: env.has_api(HostApi::LocalStorage),
        session_storage: env.has_api(HostApi::SessionStorage),
        indexed_db: env.has_api(HostApi::IndexedDb),
        web_sql: env.has_api(HostApi::WebSql),
        cache_api: env.has_api(HostApi::CacheStorage),
        quota: estimate.map(|e| e.quota),
        usage: estimate.map(|e| e.usage),
        storage_probe_failed,
    }
}

pub fn collect_hardware(env: &dyn EnvironmentProvider) -> HardwareRecord {
    let nav = available("navigator", env.navigator()).unwrap_or_default();
    let battery_supported = env.has_api(HostApi::Battery);
    let battery = if battery_supported {
        available("getBattery", env.battery())
    } else {
        None
    };

    HardwareRecord {
        hardware_concurrency: nonzero(nav.hardware_concurrency),
        device_memory: nonzero(nav.device_memory),
        max_touch_points: nonzero(nav.max_touch_points),
        pointer_support: env.has_api(HostApi::PointerEvents),
        gamepad_support: env.has_api(HostApi::Gamepads),
        vibration_support: env.has_api(HostApi::Vibration),
        battery_supported,
        battery_level: battery.map(|b| b.level),
        battery_charging: battery.map(|b| b.charging),
    }
}

pub fn collect_sensors(env: &dyn EnvironmentProvider) -> SensorRecord {
    SensorRecord {
        ambient_light_sensor: env.has_api(HostApi::AmbientLightSensor),
        proximity_sensor: env.has_api(HostApi::ProximitySensor),
        gyroscope: env.has_api(HostApi::Gyroscope),
        accelerometer: env.has_api(HostApi::Accelerometer),
        magnetometer: env.has_api(HostApi::Magnetometer),
        absolute_orientation: env.has_api(HostApi::AbsoluteOrientationSensor),
        relative_orientation: env.has_api(HostApi::RelativeOrientationSensor),
    }
}

pub fn collect_performance(env: &dyn EnvironmentProvider) -> PerformanceRecord {
    PerformanceRecord {
        navigation_timing: available("performance.timing", env.navigation_timing()),
        memory_info: available("performance.memory", env.memory_info()),
        resource_timing: env.has_api(HostApi::PerformanceEntries),
        performance_observer: env.has_api(HostApi::PerformanceObserver),
        user_timing: env.has_api(HostApi::PerformanceMark),
        mark_support: env.has_api(HostApi::PerformanceMark),
        measure_support: env.has_api(HostApi::PerformanceMeasure),
    }
}

pub fn collect_security(env: &dyn EnvironmentProvider) -> SecurityRecord {
    let policy = |meta: PolicyMeta| {
        available("document", env.policy_meta(meta))
            .flatten()
            .filter(|content| !content.is_empty())
    };
    let context = available("isSecureContext", env.security_context()).unwrap_or_default();

    SecurityRecord {
        content_security_policy: policy(PolicyMeta::ContentSecurityPolicy),
        feature_policy: policy(PolicyMeta::FeaturePolicy),
        referrer_policy: policy(PolicyMeta::Referrer),
        permissions_policy: policy(PolicyMeta::PermissionsPolicy),
        secure_context: context.secure_context,
        cross_origin_isolated: context.cross_origin_isolated,
        is_secure_context: context.secure_context,
    }
}

pub fn collect_features(env: &dyn EnvironmentProvider) -> FeatureRecord {
    FeatureRecord {
        service_worker: env.has_api(HostApi::ServiceWorker),
        push_notifications: env.has_api(HostApi::PushManager),
        web_share: env.has_api(HostApi::WebShare),
        web_bluetooth: env.has_api(HostApi::WebBluetooth),
        web_usb: env.has_api(HostApi::WebUsb),
        web_midi: env.has_api(HostApi::WebMidi),
        web_serial: env.has_api(HostApi::WebSerial),
        web_hid: env.has_api(HostApi::WebHid),
        presentation_api: env.has_api(HostApi::Presentation),
        wake_lock: env.has_api(HostApi::WakeLock),
        screen_wake_lock: env.has_api(HostApi::WakeLock),
        clipboard_api: env.has_api(HostApi::Clipboard),
        payment_request: env.has_api(HostApi::PaymentRequest),
        credential_management: env.has_api(HostApi::Credentials),
        web_authn: env.has_api(HostApi::PublicKeyCredential),
        trusted_types: env.has_api(HostApi::TrustedTypes),
        reporting_api: env.has_api(HostApi::ReportingObserver),
    }
}
