//! Graphics and canvas collectors.
//!
//! The canvas raster probe draws a fixed string twice, slightly offset and
//! in two fill styles, onto an off-screen surface and serializes the result.
//! Text rasterization depends on GPU, driver, font files and antialiasing
//! settings, so the encoded raster is a high-entropy identifying signal.

use super::available;
use super::types::{CanvasRecord, GraphicsRecord};
use crate::env::{ContextKind, EnvironmentProvider, HostApi, ProbeError};
use std::collections::BTreeMap;

/// Context limit parameters recorded from the 3D context.
pub const GRAPHICS_PARAMETERS: [&str; 15] = [
    "MAX_TEXTURE_SIZE",
    "MAX_VIEWPORT_DIMS",
    "MAX_VERTEX_UNIFORM_VECTORS",
    "MAX_FRAGMENT_UNIFORM_VECTORS",
    "MAX_VERTEX_ATTRIBS",
    "MAX_VERTEX_UNIFORM_COMPONENTS",
    "MAX_FRAGMENT_UNIFORM_COMPONENTS",
    "MAX_VARYING_VECTORS",
    "MAX_COMBINED_TEXTURE_IMAGE_UNITS",
    "MAX_VERTEX_TEXTURE_IMAGE_UNITS",
    "MAX_TEXTURE_IMAGE_UNITS",
    "MAX_CUBE_MAP_TEXTURE_SIZE",
    "ALIASED_LINE_WIDTH_RANGE",
    "ALIASED_POINT_SIZE_RANGE",
    "MAX_RENDERBUFFER_SIZE",
];

const PROBE_SURFACE_SIZE: u32 = 200;
const PROBE_TEXT: &str = "Browser fingerprinting test \u{1F36F}";
const PROBE_FONT: &str = "14px Arial";
const PROBE_OVERLAY_FILL: &str = "rgba(102, 204, 0, 0.7)";

pub fn collect_graphics(env: &dyn EnvironmentProvider) -> GraphicsRecord {
    let canvas_fingerprint = available("canvas raster", render_canvas_probe(env));

    let Some(info) = available("webgl", env.graphics_context()) else {
        return GraphicsRecord {
            canvas_fingerprint,
            ..GraphicsRecord::default()
        };
    };

    let parameters: BTreeMap<String, serde_json::Value> = GRAPHICS_PARAMETERS
        .iter()
        .filter_map(|name| {
            info.parameters
                .get(*name)
                .map(|value| (name.to_string(), value.clone()))
        })
        .collect();

    GraphicsRecord {
        vendor: info.vendor,
        renderer: info.renderer,
        version: info.version,
        shading_language_version: info.shading_language_version,
        extensions: info.extensions,
        parameters,
        canvas_fingerprint,
        supported: true,
    }
}

/// Draw the fixed probe and return the encoded raster.
fn render_canvas_probe(env: &dyn EnvironmentProvider) -> Result<String, ProbeError> {
    let mut surface = env.raster_surface(PROBE_SURFACE_SIZE, PROBE_SURFACE_SIZE)?;
    surface.set_text_baseline("top");
    surface.set_font(PROBE_FONT);
    surface.fill_text(PROBE_TEXT, 2.0, 2.0);
    surface.set_fill_style(PROBE_OVERLAY_FILL);
    surface.fill_text(PROBE_TEXT, 4.0, 4.0);

    let encoded = surface.to_data_url()?;
    if encoded.is_empty() {
        return Err(ProbeError::Rejected("empty raster".to_string()));
    }
    Ok(encoded)
}

pub fn collect_canvas(env: &dyn EnvironmentProvider) -> CanvasRecord {
    CanvasRecord {
        canvas_2d: env.context_supported(ContextKind::TwoD),
        canvas_webgl: env.context_supported(ContextKind::Webgl),
        canvas_webgl2: env.context_supported(ContextKind::Webgl2),
        canvas_bitmap_renderer: env.context_supported(ContextKind::BitmapRenderer),
        canvas_image_bitmap: env.has_api(HostApi::CreateImageBitmap),
        canvas_offscreen: env.has_api(HostApi::OffscreenCanvas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fixtures;

    #[test]
    fn test_graphics_on_full_host() {
        let record = collect_graphics(&fixtures::desktop());
        assert!(record.supported);
        assert_eq!(record.vendor.as_deref(), Some("WebKit"));
        assert_eq!(record.extensions.len(), 2);
        assert!(record
            .canvas_fingerprint
            .as_deref()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_only_known_parameters_recorded() {
        let record = collect_graphics(&fixtures::desktop());
        assert_eq!(record.parameters.len(), 3);
        assert!(record.parameters.contains_key("MAX_TEXTURE_SIZE"));
        assert!(!record.parameters.contains_key("UNMASKED_VENDOR_WEBGL"));
    }

    #[test]
    fn test_canvas_probe_is_stable() {
        let env = fixtures::desktop();
        assert_eq!(
            collect_graphics(&env).canvas_fingerprint,
            collect_graphics(&env).canvas_fingerprint
        );
    }

    #[test]
    fn test_raster_survives_missing_webgl() {
        let mut env = fixtures::desktop();
        env.contexts.remove(&ContextKind::Webgl);
        let record = collect_graphics(&env);
        assert!(!record.supported);
        assert_eq!(record.vendor, None);
        assert!(record.extensions.is_empty());
        assert!(record.canvas_fingerprint.is_some());
    }

    #[test]
    fn test_no_canvas_at_all() {
        let record = collect_graphics(&fixtures::bare());
        assert_eq!(record, GraphicsRecord::default());
    }

    #[test]
    fn test_canvas_context_support() {
        let record = collect_canvas(&fixtures::desktop());
        assert!(record.canvas_2d);
        assert!(record.canvas_webgl2);
        assert!(!record.canvas_bitmap_renderer);
        assert!(record.canvas_offscreen);

        assert_eq!(collect_canvas(&fixtures::bare()), CanvasRecord::default());
    }
}
