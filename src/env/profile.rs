//! Host described by a JSON profile.
//!
//! A profile lists the capability values a host exposes. Anything left out
//! is reported as unsupported. Profiles are how the CLI probes a captured
//! browser environment, and how tests pin a host down to exact values.

use super::{
    AudioInfo, BatteryInfo, ConnectionInfo, ContextKind, EnvironmentProvider, GraphicsInfo,
    HostApi, LocationInfo, MimeTypeInfo, NavigatorInfo, PermissionName, PermissionState,
    PluginInfo, PolicyMeta, ProbeError, RasterSurface, ScreenInfo, SecurityContext,
    StorageEstimate, TextBox, TextProbe, ViewportInfo,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

/// Errors loading a profile document.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A host runtime described by data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostProfile {
    /// Fixed clock; the real clock is used when absent
    pub clock: Option<DateTime<Utc>>,
    pub navigator: Option<NavigatorInfo>,
    pub screen: Option<ScreenInfo>,
    pub viewport: Option<ViewportInfo>,
    pub location: Option<LocationInfo>,
    pub timezone: Option<String>,
    pub apis: BTreeSet<HostApi>,
    pub contexts: BTreeSet<ContextKind>,
    pub graphics: Option<GraphicsInfo>,
    /// Identifies the rasterization stack (GPU, driver, font renderer)
    pub render_signature: Option<String>,
    pub audio: Option<AudioInfo>,
    pub connection: Option<ConnectionInfo>,
    pub storage_estimate: Option<StorageEstimate>,
    /// Opening a database throws (typical of some private modes)
    pub storage_blocked: bool,
    pub battery: Option<BatteryInfo>,
    pub navigation_timing: Option<BTreeMap<String, f64>>,
    pub memory_info: Option<BTreeMap<String, f64>>,
    /// Document meta policies; `None` means no document is available
    pub policies: Option<BTreeMap<PolicyMeta, String>>,
    pub security: Option<SecurityContext>,
    /// Installed font families; `None` means no text layout engine
    pub fonts: Option<Vec<String>>,
    pub plugins: Option<Vec<PluginInfo>>,
    pub mime_types: Option<Vec<MimeTypeInfo>>,
    /// Result of `(hover: hover)`; `None` means no media query support
    pub hover: Option<bool>,
    /// Permission registry; `None` means the Permissions API is absent.
    /// Names missing from a present registry make the query throw.
    pub permissions: Option<BTreeMap<PermissionName, PermissionState>>,
}

impl HostProfile {
    /// Load a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[async_trait]
impl EnvironmentProvider for HostProfile {
    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    fn navigator(&self) -> Result<NavigatorInfo, ProbeError> {
        self.navigator
            .clone()
            .ok_or(ProbeError::Unsupported("navigator"))
    }

    fn screen(&self) -> Result<ScreenInfo, ProbeError> {
        self.screen.clone().ok_or(ProbeError::Unsupported("screen"))
    }

    fn viewport(&self) -> Result<ViewportInfo, ProbeError> {
        self.viewport.clone().ok_or(ProbeError::Unsupported("window"))
    }

    fn location(&self) -> Result<LocationInfo, ProbeError> {
        self.location
            .clone()
            .ok_or(ProbeError::Unsupported("location"))
    }

    fn timezone(&self) -> Result<String, ProbeError> {
        self.timezone
            .clone()
            .ok_or(ProbeError::Unsupported("Intl.DateTimeFormat"))
    }

    fn has_api(&self, api: HostApi) -> bool {
        self.apis.contains(&api)
    }

    fn context_supported(&self, kind: ContextKind) -> bool {
        self.contexts.contains(&kind)
    }

    fn graphics_context(&self) -> Result<GraphicsInfo, ProbeError> {
        if !self.contexts.contains(&ContextKind::Webgl) {
            return Err(ProbeError::Unsupported("webgl"));
        }
        Ok(self.graphics.clone().unwrap_or_default())
    }

    fn raster_surface(&self, width: u32, height: u32) -> Result<Box<dyn RasterSurface>, ProbeError> {
        if !self.contexts.contains(&ContextKind::TwoD) {
            return Err(ProbeError::Unsupported("canvas 2d"));
        }
        Ok(Box::new(RecordingSurface::new(
            width,
            height,
            self.render_signature.clone().unwrap_or_default(),
        )))
    }

    fn audio_context(&self) -> Result<AudioInfo, ProbeError> {
        self.audio
            .clone()
            .ok_or(ProbeError::Unsupported("AudioContext"))
    }

    fn connection(&self) -> Result<ConnectionInfo, ProbeError> {
        self.connection
            .clone()
            .ok_or(ProbeError::Unsupported("navigator.connection"))
    }

    fn storage_estimate(&self) -> Result<StorageEstimate, ProbeError> {
        self.storage_estimate
            .ok_or(ProbeError::Unsupported("StorageManager"))
    }

    fn probe_storage(&self) -> Result<(), ProbeError> {
        if !self.apis.contains(&HostApi::IndexedDb) {
            return Err(ProbeError::Unsupported("indexedDB"));
        }
        if self.storage_blocked {
            return Err(ProbeError::Rejected(
                "InvalidStateError: a mutation operation was attempted on a database that did not allow mutations".to_string(),
            ));
        }
        Ok(())
    }

    fn battery(&self) -> Result<BatteryInfo, ProbeError> {
        self.battery.ok_or(ProbeError::Unsupported("getBattery"))
    }

    fn navigation_timing(&self) -> Result<BTreeMap<String, f64>, ProbeError> {
        self.navigation_timing
            .clone()
            .ok_or(ProbeError::Unsupported("performance.timing"))
    }

    fn memory_info(&self) -> Result<BTreeMap<String, f64>, ProbeError> {
        self.memory_info
            .clone()
            .ok_or(ProbeError::Unsupported("performance.memory"))
    }

    fn policy_meta(&self, policy: PolicyMeta) -> Result<Option<String>, ProbeError> {
        self.policies
            .as_ref()
            .map(|policies| policies.get(&policy).cloned())
            .ok_or(ProbeError::Unsupported("document"))
    }

    fn security_context(&self) -> Result<SecurityContext, ProbeError> {
        self.security
            .ok_or(ProbeError::Unsupported("isSecureContext"))
    }

    fn text_probe(&self, text: &str, size_px: u32) -> Result<Box<dyn TextProbe>, ProbeError> {
        let fonts = self
            .fonts
            .as_ref()
            .ok_or(ProbeError::Unsupported("text layout"))?;
        Ok(Box::new(ModelTextProbe {
            installed: fonts.iter().map(|f| f.to_lowercase()).collect(),
            chars: text.chars().count(),
            size_px: f64::from(size_px),
        }))
    }

    fn plugins(&self) -> Result<Vec<PluginInfo>, ProbeError> {
        self.plugins
            .clone()
            .ok_or(ProbeError::Unsupported("navigator.plugins"))
    }

    fn mime_types(&self) -> Result<Vec<MimeTypeInfo>, ProbeError> {
        self.mime_types
            .clone()
            .ok_or(ProbeError::Unsupported("navigator.mimeTypes"))
    }

    fn media_query(&self, query: &str) -> Result<bool, ProbeError> {
        let hover = self.hover.ok_or(ProbeError::Unsupported("matchMedia"))?;
        match query {
            "(hover: hover)" => Ok(hover),
            "(hover: none)" => Ok(!hover),
            other => Err(ProbeError::Rejected(format!("unknown media query {other}"))),
        }
    }

    async fn query_permission(&self, name: PermissionName) -> Result<PermissionState, ProbeError> {
        let registry = self
            .permissions
            .as_ref()
            .ok_or(ProbeError::Unsupported("navigator.permissions"))?;
        registry.get(&name).copied().ok_or_else(|| {
            ProbeError::Rejected(format!(
                "TypeError: '{}' is not a valid value for enumeration PermissionName",
                name.as_str()
            ))
        })
    }
}

/// Raster surface that records draw calls.
///
/// The serialized raster is a function of the surface size, every draw
/// call, and the host's render signature, so identical hosts produce
/// identical output.
struct RecordingSurface {
    width: u32,
    height: u32,
    signature: String,
    baseline: String,
    font: String,
    fill_style: String,
    ops: Vec<String>,
}

impl RecordingSurface {
    fn new(width: u32, height: u32, signature: String) -> Self {
        Self {
            width,
            height,
            signature,
            baseline: "alphabetic".to_string(),
            font: "10px sans-serif".to_string(),
            fill_style: "#000000".to_string(),
            ops: Vec::new(),
        }
    }
}

impl RasterSurface for RecordingSurface {
    fn set_text_baseline(&mut self, baseline: &str) {
        self.baseline = baseline.to_string();
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }

    fn set_fill_style(&mut self, style: &str) {
        self.fill_style = style.to_string();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(format!(
            "text({text};{x};{y};{};{};{})",
            self.font, self.fill_style, self.baseline
        ));
    }

    fn to_data_url(&self) -> Result<String, ProbeError> {
        let raster = format!(
            "{}x{}|{}|{}",
            self.width,
            self.height,
            self.ops.join(","),
            self.signature
        );
        Ok(format!("data:image/png;base64,{}", BASE64.encode(raster)))
    }
}

/// Generic families always resolve; each has its own advance width.
const GENERIC_FAMILIES: [(&str, f64); 3] = [("monospace", 0.60), ("sans-serif", 0.55), ("serif", 0.50)];

/// Text measurement model for profiled hosts.
///
/// The first family of a stack that is installed (or generic) renders the
/// text. Named fonts get a width factor derived from their name, so any
/// installed font measures differently from at least two generic baselines.
struct ModelTextProbe {
    installed: BTreeSet<String>,
    chars: usize,
    size_px: f64,
}

impl ModelTextProbe {
    fn width_factor(&self, family: &str) -> Option<f64> {
        let family = family.trim().trim_matches(|c| c == '"' || c == '\'');
        let lower = family.to_lowercase();
        if let Some((_, factor)) = GENERIC_FAMILIES.iter().find(|(name, _)| *name == lower) {
            return Some(*factor);
        }
        if self.installed.contains(&lower) {
            let spread = lower.bytes().map(u32::from).sum::<u32>() % 37;
            return Some(0.40 + f64::from(spread) / 100.0 + 0.005);
        }
        None
    }
}

impl TextProbe for ModelTextProbe {
    fn measure(&mut self, font_family: &str) -> Result<TextBox, ProbeError> {
        // Browsers fall back to the default serif face when nothing matches
        let factor = font_family
            .split(',')
            .find_map(|family| self.width_factor(family))
            .unwrap_or(0.50);
        Ok(TextBox {
            width: (factor * self.size_px * self.chars as f64).round(),
            height: (self.size_px * 1.15).round(),
        })
    }
}
