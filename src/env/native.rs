//! Provider for the machine the probe runs on.
//!
//! A native process has no display server handle, graphics context, audio
//! context, permission registry or text layout engine to introspect, so
//! those capabilities report as unsupported. What it does expose (logical
//! CPUs, memory, locale, timezone, host name) is read from the OS.

use super::{EnvironmentProvider, LocationInfo, NavigatorInfo, ProbeError};
use async_trait::async_trait;
use chrono_tz::Tz;
use std::path::Path;
use sysinfo::System;

/// Zoneinfo path segment preceding the IANA name in `/etc/localtime` links.
const ZONEINFO_MARKER: &str = "zoneinfo/";

/// Browsers cap reported device memory at this many GiB.
const DEVICE_MEMORY_CAP_GIB: f64 = 8.0;

/// Environment backed by the local operating system.
#[derive(Debug, Default)]
pub struct NativeEnvironment {
    _private: (),
}

impl NativeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnvironmentProvider for NativeEnvironment {
    fn navigator(&self) -> Result<NavigatorInfo, ProbeError> {
        let (language, languages) = locale_from_env();
        Ok(NavigatorInfo {
            user_agent: Some(format!(
                "envprobe/{} ({}; {})",
                crate::VERSION,
                System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string()),
                std::env::consts::ARCH
            )),
            language,
            languages,
            cookie_enabled: false,
            do_not_track: None,
            on_line: false,
            platform: Some(platform_string()),
            vendor: None,
            hardware_concurrency: std::thread::available_parallelism()
                .ok()
                .map(|n| n.get() as u32),
            device_memory: device_memory_gib(),
            max_touch_points: None,
        })
    }

    fn location(&self) -> Result<LocationInfo, ProbeError> {
        let hostname = hostname::get()
            .map_err(|e| ProbeError::Rejected(e.to_string()))?
            .to_string_lossy()
            .into_owned();
        let pathname = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "/".to_string());

        Ok(LocationInfo {
            href: format!("file://{hostname}{pathname}"),
            origin: "null".to_string(),
            protocol: "file:".to_string(),
            host: hostname.clone(),
            hostname,
            port: String::new(),
            pathname,
            search: String::new(),
            hash: String::new(),
        })
    }

    fn timezone(&self) -> Result<String, ProbeError> {
        if let Ok(tz) = std::env::var("TZ") {
            let name = tz.trim_start_matches(':');
            if name.parse::<Tz>().is_ok() {
                return Ok(name.to_string());
            }
        }

        let target = std::fs::read_link(Path::new("/etc/localtime"))
            .map_err(|_| ProbeError::Unsupported("timezone database"))?;
        let target = target.to_string_lossy();
        let name = target
            .rsplit_once(ZONEINFO_MARKER)
            .map(|(_, name)| name)
            .ok_or_else(|| ProbeError::Rejected(format!("unrecognized localtime link {target}")))?;

        name.parse::<Tz>()
            .map(|tz| tz.name().to_string())
            .map_err(|e| ProbeError::Rejected(e.to_string()))
    }
}

/// Navigator-style platform string.
fn platform_string() -> String {
    match std::env::consts::OS {
        "linux" => format!("Linux {}", std::env::consts::ARCH),
        "macos" => "MacIntel".to_string(),
        "windows" => "Win32".to_string(),
        other => other.to_string(),
    }
}

/// Total memory rounded down to a power of two GiB, capped like browsers do.
fn device_memory_gib() -> Option<f64> {
    let mut system = System::new();
    system.refresh_memory();
    let total = system.total_memory();
    if total == 0 {
        return None;
    }

    let gib = total as f64 / (1024.0 * 1024.0 * 1024.0);
    let rounded = 2f64.powi(gib.log2().floor() as i32);
    Some(rounded.clamp(0.25, DEVICE_MEMORY_CAP_GIB))
}

/// Primary language and preference list from POSIX locale variables.
fn locale_from_env() -> (Option<String>, Vec<String>) {
    let primary = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|value| posix_to_bcp47(&value));

    let mut languages: Vec<String> = std::env::var("LANGUAGE")
        .map(|value| value.split(':').filter_map(posix_to_bcp47).collect())
        .unwrap_or_default();
    if languages.is_empty() {
        languages.extend(primary.clone());
    }

    (primary, languages)
}

/// Convert `en_US.UTF-8` to `en-US`. Returns `None` for C/POSIX locales.
fn posix_to_bcp47(value: &str) -> Option<String> {
    let tag = value.split(['.', '@']).next()?.trim();
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.replace('_', "-"))
}
