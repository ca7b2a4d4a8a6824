//! Font availability detection by rendered-width comparison.
//!
//! A test string is measured in each generic baseline family, then in
//! `"<candidate>", <baseline>` stacks. If the candidate is installed the
//! browser renders it instead of the fallback and the box changes size.

use super::available;
use super::types::FontRecord;
use crate::env::{EnvironmentProvider, ProbeError, TextBox, TextProbe};

/// Candidate fonts, in detection order.
pub const REFERENCE_FONTS: [&str; 20] = [
    "Arial",
    "Verdana",
    "Helvetica",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Palatino",
    "Garamond",
    "Bookman",
    "Comic Sans MS",
    "Trebuchet MS",
    "Arial Black",
    "Impact",
    "Lucida Console",
    "Tahoma",
    "Geneva",
    "Lucida Sans Unicode",
    "Franklin Gothic Medium",
    "Arial Narrow",
    "Brush Script MT",
];

const BASELINE_FAMILIES: [&str; 3] = ["monospace", "sans-serif", "serif"];
const TEST_STRING: &str = "mmmmmmmmmmlli";
const TEST_SIZE_PX: u32 = 72;

pub fn collect_fonts(env: &dyn EnvironmentProvider) -> FontRecord {
    let detected = available("text layout", detect_fonts(env)).unwrap_or_default();

    let font_fingerprint = if detected.is_empty() {
        None
    } else {
        let mut sorted = detected.clone();
        sorted.sort();
        Some(sorted.join(","))
    };

    FontRecord {
        font_count: detected.len(),
        font_fingerprint,
        font_list: detected.clone(),
        available_fonts: detected,
    }
}

fn detect_fonts(env: &dyn EnvironmentProvider) -> Result<Vec<String>, ProbeError> {
    // The probe element is detached when `probe` drops at the end of scope
    let mut probe = env.text_probe(TEST_STRING, TEST_SIZE_PX)?;

    let mut baselines: Vec<(&str, TextBox)> = Vec::with_capacity(BASELINE_FAMILIES.len());
    for family in BASELINE_FAMILIES {
        baselines.push((family, probe.measure(family)?));
    }

    let mut detected = Vec::new();
    for font in REFERENCE_FONTS {
        if is_installed(probe.as_mut(), font, &baselines) {
            detected.push(font.to_string());
        }
    }
    tracing::debug!(count = detected.len(), "font detection finished");
    Ok(detected)
}

fn is_installed(probe: &mut dyn TextProbe, font: &str, baselines: &[(&str, TextBox)]) -> bool {
    baselines.iter().any(|(family, base)| {
        match probe.measure(&format!("'{font}', {family}")) {
            Ok(measured) => measured != *base,
            Err(err) => {
                tracing::debug!(font, error = %err, "font measurement failed");
                false
            }
        }
    })
}
