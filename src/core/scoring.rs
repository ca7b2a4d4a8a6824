//! Privacy and uniqueness scoring.
//!
//! Both scores are driven by one table of signals. A triggered signal
//! lowers the privacy score by its penalty and raises the uniqueness score
//! by its weight. Privacy starts at 100 and is floored at 0; uniqueness
//! starts at 0 and is capped at 100.

use crate::core::snapshot::Snapshot;

/// An identifying signal and what it costs.
pub struct Signal {
    pub name: &'static str,
    pub privacy_penalty: u32,
    pub uniqueness_weight: u32,
    pub triggered: fn(&Snapshot) -> bool,
}

/// Whether a collected string carries a value. Empty strings do not.
pub(crate) fn known(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

pub static SIGNALS: [Signal; 14] = [
    Signal {
        name: "canvas_fingerprint",
        privacy_penalty: 10,
        uniqueness_weight: 25,
        triggered: |s| known(&s.graphics.canvas_fingerprint),
    },
    Signal {
        name: "audio_fingerprint",
        privacy_penalty: 5,
        uniqueness_weight: 15,
        triggered: |s| known(&s.audio.audio_fingerprint),
    },
    Signal {
        name: "font_fingerprint",
        privacy_penalty: 5,
        uniqueness_weight: 15,
        triggered: |s| known(&s.fonts.font_fingerprint),
    },
    Signal {
        name: "hardware_concurrency",
        privacy_penalty: 3,
        uniqueness_weight: 10,
        triggered: |s| s.hardware.hardware_concurrency.is_some_and(|n| n > 0),
    },
    Signal {
        name: "device_memory",
        privacy_penalty: 3,
        uniqueness_weight: 10,
        triggered: |s| s.hardware.device_memory.is_some_and(|m| m > 0.0),
    },
    Signal {
        name: "max_touch_points",
        privacy_penalty: 2,
        uniqueness_weight: 5,
        triggered: |s| s.hardware.max_touch_points.is_some_and(|n| n > 0),
    },
    Signal {
        name: "graphics_vendor",
        privacy_penalty: 2,
        uniqueness_weight: 5,
        triggered: |s| known(&s.graphics.vendor),
    },
    Signal {
        name: "graphics_renderer",
        privacy_penalty: 2,
        uniqueness_weight: 5,
        triggered: |s| known(&s.graphics.renderer),
    },
    Signal {
        name: "graphics_extensions",
        privacy_penalty: 1,
        uniqueness_weight: 2,
        triggered: |s| !s.graphics.extensions.is_empty(),
    },
    Signal {
        name: "plugins",
        privacy_penalty: 1,
        uniqueness_weight: 3,
        triggered: |s| s.plugins.plugin_count > 0,
    },
    Signal {
        name: "mime_types",
        privacy_penalty: 1,
        uniqueness_weight: 3,
        triggered: |s| s.plugins.mime_type_count > 0,
    },
    Signal {
        name: "many_fonts",
        privacy_penalty: 2,
        uniqueness_weight: 5,
        triggered: |s| s.fonts.font_count > 10,
    },
    Signal {
        name: "timezone",
        privacy_penalty: 1,
        uniqueness_weight: 0,
        triggered: |s| known(&s.time.timezone),
    },
    Signal {
        name: "large_screen",
        privacy_penalty: 1,
        uniqueness_weight: 2,
        triggered: |s| s.screen.is_large(),
    },
];

/// Signals that fire for a snapshot, in table order.
pub fn triggered_signals(snapshot: &Snapshot) -> impl Iterator<Item = &'static Signal> + '_ {
    SIGNALS.iter().filter(move |signal| (signal.triggered)(snapshot))
}

/// Privacy score in `0..=100`; higher means fewer identifying signals.
pub fn privacy_score(snapshot: &Snapshot) -> u8 {
    let penalty: u32 = triggered_signals(snapshot)
        .map(|signal| signal.privacy_penalty)
        .sum();
    100u32.saturating_sub(penalty) as u8
}

/// Uniqueness score in `0..=100`; higher means more identifying signals.
pub fn uniqueness_score(snapshot: &Snapshot) -> u8 {
    let weight: u32 = triggered_signals(snapshot)
        .map(|signal| signal.uniqueness_weight)
        .sum();
    weight.min(100) as u8
}
