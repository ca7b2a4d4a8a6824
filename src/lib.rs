//! envprobe - environment capability probe.
//!
//! Reads every capability a host runtime exposes (display geometry,
//! hardware hints, graphics and audio stacks, installed fonts, permission
//! states, network hints, feature flags) and reduces it to a fingerprint
//! token, a privacy score, a uniqueness score and a recommendation report.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          envprobe                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────────┐    │
//! │  │ Environment │──▶│ Collectors  │──▶│    Snapshot      │    │
//! │  │  Provider   │   │ (20 records)│   │   (aggregator)   │    │
//! │  └─────────────┘   └─────────────┘   └──────────────────┘    │
//! │                                        │          │          │
//! │                                        ▼          ▼          │
//! │                              ┌─────────────┐ ┌──────────┐    │
//! │                              │ Fingerprint │ │ Scoring  │    │
//! │                              └─────────────┘ └──────────┘    │
//! │                                        │          │          │
//! │                                        ▼          ▼          │
//! │                                     ┌────────────────┐       │
//! │                                     │     Report     │       │
//! │                                     └────────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use envprobe::{collect_and_score, HostProfile};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let host = HostProfile::load(std::path::Path::new("host.json"))?;
//! let (snapshot, report) = collect_and_score(&host).await;
//! println!("{} privacy={} uniqueness={}", report.fingerprint, snapshot.privacy_score, snapshot.uniqueness_score);
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod env;
pub mod export;
pub mod session;
pub mod transparency;

pub use collector::Category;
pub use config::{Config, ConfigError};
pub use crate::core::{
    collect_and_score, collect_basic, collect_snapshot, generate_fingerprint, generate_report,
    privacy_score, similarity, uniqueness_score, BasicSnapshot, FingerprintReport, Level,
    Snapshot,
};
pub use env::{EnvironmentProvider, HostProfile, ProbeError};
pub use export::ExportError;
pub use session::{CollectionError, ProbeSession};
pub use transparency::{SharedTransparencyLog, TransparencyLog, TransparencyStats};

#[cfg(feature = "native")]
pub use env::NativeEnvironment;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What a probe pass reads, for display to users.
pub const DISCLOSURE: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                   ENVPROBE - DATA DISCLOSURE                     ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  A probe pass reads what any web page can read about a host.     ║
║                                                                  ║
║  ✓ WHAT A PASS READS:                                            ║
║    • Browser identity, language and platform strings             ║
║    • Screen and window geometry, timezone                        ║
║    • Graphics and audio stack properties                         ║
║    • Installed fonts (by rendered-width comparison)              ║
║    • Permission states, feature and sensor availability          ║
║                                                                  ║
║  ✗ WHAT A PASS NEVER DOES:                                       ║
║    • Request a permission or trigger a prompt                    ║
║    • Send anything off this device                               ║
║    • Keep data between runs unless you export it                 ║
║    • Harvest local network addresses                             ║
║                                                                  ║
║  Temporary probe objects (an off-screen canvas, a hidden text    ║
║  element) are removed before the pass returns.                   ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disclosure_contents() {
        assert!(DISCLOSURE.contains("DISCLOSURE"));
        assert!(DISCLOSURE.contains("NEVER DOES"));
        assert!(DISCLOSURE.contains("off this device"));
    }
}
