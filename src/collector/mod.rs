//! Category collectors.
//!
//! Each collector reads one capability category through an
//! [`EnvironmentProvider`](crate::env::EnvironmentProvider) and returns a
//! fresh record. Failed host queries become absent values inside the
//! collector; nothing a host does can make a collector fail.
//! Collectors share no state and may run in any order.

pub mod display;
pub mod fonts;
pub mod graphics;
pub mod media;
pub mod permissions;
pub mod platform;
pub mod plugins;
pub mod types;

pub use display::{
    collect_browser, collect_device, collect_location, collect_screen, collect_time,
    collect_window,
};
pub use fonts::{collect_fonts, REFERENCE_FONTS};
pub use graphics::{collect_canvas, collect_graphics};
pub use media::{collect_audio, collect_media};
pub use permissions::collect_permissions;
pub use platform::{
    collect_features, collect_hardware, collect_network, collect_performance, collect_security,
    collect_sensors, collect_storage,
};
pub use plugins::collect_plugins;
pub use types::{
    field_count, AudioRecord, BrowserRecord, CanvasRecord, Category, DeviceRecord, FeatureRecord,
    FontRecord, GraphicsRecord, HardwareRecord, LocationRecord, MediaRecord, NetworkRecord,
    PerformanceRecord, PermissionRecord, PluginRecord, ScreenRecord, SecurityRecord, SensorRecord,
    StorageRecord, TimeRecord, WindowRecord,
};

use crate::env::ProbeError;

/// Convert a host query result into an optional value, logging failures.
pub(crate) fn available<T>(capability: &str, result: Result<T, ProbeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(capability, error = %err, "capability absent");
            None
        }
    }
}

/// Treat zero as "not reported", the way hosts signal unknown hints.
pub(crate) fn nonzero<T: Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}
