//! Fingerprint canonicalization.
//!
//! A fixed, ordered list of identity-relevant snapshot fields is rendered
//! to strings, absent fields are dropped, and the rest are joined with `|`.
//! The canonical string is base64-encoded (URL-safe alphabet, no padding)
//! and folded into a fixed-width token: symbol `i` of the encoding is added
//! (mod 64) into slot `i % 32`. Every symbol contributes to the token, so a
//! change in any canonical field shows up in it.
//!
//! The token identifies a host configuration for convenience. It is not a
//! hash and gives no collision resistance.

use crate::core::snapshot::Snapshot;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Number of symbols in a fingerprint token.
pub const FINGERPRINT_LEN: usize = 32;

const COMPONENT_SEPARATOR: &str = "|";
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn text(value: &Option<String>) -> Option<String> {
    value.clone()
}

fn number<T: ToString>(value: Option<T>) -> Option<String> {
    value.map(|v| v.to_string())
}

/// Canonical components of a snapshot, in canonical order, absent ones
/// removed.
pub fn canonical_components(snapshot: &Snapshot) -> Vec<String> {
    let browser = &snapshot.browser;
    let screen = &snapshot.screen;
    let window = &snapshot.window;
    let hardware = &snapshot.hardware;
    let graphics = &snapshot.graphics;

    [
        text(&browser.user_agent),
        text(&browser.language),
        text(&browser.platform),
        text(&browser.vendor),
        number(screen.width),
        number(screen.height),
        number(screen.color_depth),
        number(screen.pixel_depth),
        number(window.inner_width),
        number(window.inner_height),
        number(window.device_pixel_ratio),
        number(hardware.hardware_concurrency),
        number(hardware.device_memory),
        number(hardware.max_touch_points),
        text(&graphics.vendor),
        text(&graphics.renderer),
        text(&graphics.version),
        text(&snapshot.fonts.font_fingerprint),
        Some(snapshot.plugins.plugin_count.to_string()),
        Some(snapshot.plugins.mime_type_count.to_string()),
        text(&graphics.canvas_fingerprint),
        text(&snapshot.audio.audio_fingerprint),
        text(&snapshot.time.timezone),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn canonical_string(snapshot: &Snapshot) -> String {
    canonical_components(snapshot).join(COMPONENT_SEPARATOR)
}

/// Compute the fingerprint token of a snapshot. Pure.
pub fn generate_fingerprint(snapshot: &Snapshot) -> String {
    fold_token(&canonical_string(snapshot))
}

fn fold_token(canonical: &str) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(canonical.as_bytes());
    let mut slots = [0u8; FINGERPRINT_LEN];
    for (i, symbol) in encoded.bytes().enumerate() {
        let slot = &mut slots[i % FINGERPRINT_LEN];
        *slot = (*slot + sextet(symbol)) % 64;
    }
    slots.iter().map(|v| ALPHABET[usize::from(*v)] as char).collect()
}

fn sextet(symbol: u8) -> u8 {
    match symbol {
        b'A'..=b'Z' => symbol - b'A',
        b'a'..=b'z' => symbol - b'a' + 26,
        b'0'..=b'9' => symbol - b'0' + 52,
        b'-' => 62,
        _ => 63,
    }
}

/// Percentage of positions at which two tokens carry the same symbol,
/// relative to the longer token. Identical tokens score 100.
pub fn similarity(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    let longest = a.chars().count().max(b.chars().count());
    let matching = a
        .chars()
        .zip(b.chars())
        .filter(|(left, right)| left == right)
        .count();
    ((matching * 100 + longest / 2) / longest) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.browser.user_agent = Some("Mozilla/5.0".to_string());
        snapshot.browser.language = Some("en-US".to_string());
        snapshot.screen.width = Some(1920);
        snapshot.screen.height = Some(1080);
        snapshot.window.device_pixel_ratio = Some(1.5);
        snapshot.hardware.hardware_concurrency = Some(4);
        snapshot.fonts.font_fingerprint = Some("Arial,Verdana".to_string());
        snapshot.graphics.canvas_fingerprint = Some("data:image/png;base64,AAAA".to_string());
        snapshot.time.timezone = Some("UTC".to_string());
        snapshot
    }

    #[test]
    fn test_canonical_order_and_filtering() {
        assert_eq!(
            canonical_string(&sample()),
            "Mozilla/5.0|en-US|1920|1080|1.5|4|Arial,Verdana|0|0|data:image/png;base64,AAAA|UTC"
        );
    }

    #[test]
    fn test_empty_snapshot_canonical() {
        // plugin counts are always known
        assert_eq!(canonical_string(&Snapshot::default()), "0|0");
    }

    #[test]
    fn test_token_shape() {
        let token = generate_fingerprint(&sample());
        assert_eq!(token.len(), FINGERPRINT_LEN);
        assert!(token.bytes().all(|b| ALPHABET.contains(&b)));
        assert_eq!(fold_token(""), "A".repeat(FINGERPRINT_LEN));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_fingerprint(&sample()), generate_fingerprint(&sample()));
    }

    #[test]
    fn test_metadata_excluded() {
        let a = sample();
        let mut b = sample();
        b.session_id = "other".to_string();
        b.collected_at = chrono::Utc::now();
        b.privacy_score = 12;
        assert_eq!(generate_fingerprint(&a), generate_fingerprint(&b));
    }

    #[test]
    fn test_each_canonical_field_changes_token() {
        let base = generate_fingerprint(&sample());
        // one mutation per canonical component
        let mutations: [(&str, fn(&mut Snapshot)); 23] = [
            ("userAgent", |s| s.browser.user_agent = Some("Mozilla/6.0".to_string())),
            ("language", |s| s.browser.language = Some("de-DE".to_string())),
            ("platform", |s| s.browser.platform = Some("Win32".to_string())),
            ("vendor", |s| s.browser.vendor = Some("Google Inc.".to_string())),
            ("width", |s| s.screen.width = Some(2560)),
            ("height", |s| s.screen.height = Some(1200)),
            ("colorDepth", |s| s.screen.color_depth = Some(24)),
            ("pixelDepth", |s| s.screen.pixel_depth = Some(30)),
            ("innerWidth", |s| s.window.inner_width = Some(800)),
            ("innerHeight", |s| s.window.inner_height = Some(600)),
            ("devicePixelRatio", |s| s.window.device_pixel_ratio = Some(2.0)),
            ("hardwareConcurrency", |s| s.hardware.hardware_concurrency = Some(16)),
            ("deviceMemory", |s| s.hardware.device_memory = Some(4.0)),
            ("maxTouchPoints", |s| s.hardware.max_touch_points = Some(10)),
            ("graphicsVendor", |s| s.graphics.vendor = Some("WebKit".to_string())),
            ("renderer", |s| s.graphics.renderer = Some("ANGLE".to_string())),
            ("graphicsVersion", |s| s.graphics.version = Some("WebGL 1.0".to_string())),
            ("fontFingerprint", |s| s.fonts.font_fingerprint = Some("Arial".to_string())),
            ("pluginCount", |s| s.plugins.plugin_count = 2),
            ("mimeTypeCount", |s| s.plugins.mime_type_count = 3),
            ("canvasFingerprint", |s| {
                s.graphics.canvas_fingerprint = Some("data:image/png;base64,AAAB".to_string())
            }),
            ("audioFingerprint", |s| s.audio.audio_fingerprint = Some("44100-2-2".to_string())),
            ("timezone", |s| s.time.timezone = Some("Asia/Tokyo".to_string())),
        ];
        for (field, mutate) in mutations {
            let mut snapshot = sample();
            mutate(&mut snapshot);
            assert_ne!(generate_fingerprint(&snapshot), base, "{field}");
        }
    }

    #[test]
    fn test_non_canonical_field_ignored() {
        let mut snapshot = sample();
        snapshot.sensors.gyroscope = true;
        snapshot.browser.cookie_enabled = true;
        assert_eq!(generate_fingerprint(&snapshot), generate_fingerprint(&sample()));
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("abcd", "abcd"), 100);
        assert_eq!(similarity("abcd", "abzz"), 50);
        assert_eq!(similarity("abcd", "ab"), 50);
        assert_eq!(similarity("abcd", "wxyz"), 0);
        assert_eq!(similarity("", ""), 100);
    }
}
