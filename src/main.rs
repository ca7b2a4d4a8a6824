//! envprobe CLI
//!
//! Probe a host environment, score it, and export the results.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use envprobe::{
    collect_basic,
    config::Config,
    core::{similarity, FingerprintReport, Snapshot},
    env::{EnvironmentProvider, HostProfile},
    session::ProbeSession,
    DISCLOSURE, VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "envprobe")]
#[command(version = VERSION)]
#[command(about = "Probe a host environment and score how identifying it is", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full collection pass and print the report
    Scan {
        /// Host profile to probe instead of this machine
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Print the snapshot and report as JSON
        #[arg(long)]
        json: bool,

        /// Also export the snapshot to the configured directory
        #[arg(long)]
        export: bool,
    },

    /// Print the basic identity, display and time fields
    Basic {
        /// Host profile to probe instead of this machine
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Re-run collection passes until interrupted
    Watch {
        /// Host profile to probe instead of this machine
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Seconds between passes (defaults to the configured interval)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Collect once and write the snapshot to a JSON file
    Export {
        /// Host profile to probe instead of this machine
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Output directory
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Write the report alongside the snapshot
        #[arg(long)]
        with_report: bool,
    },

    /// Display what a probe pass reads
    Disclosure,

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Could not load config, using defaults: {e}");
        Config::default()
    });

    match cli.command {
        Commands::Scan {
            profile,
            json,
            export,
        } => cmd_scan(&config, profile, json, export).await,
        Commands::Basic { profile } => cmd_basic(&config, profile),
        Commands::Watch { profile, interval } => cmd_watch(&config, profile, interval).await,
        Commands::Export {
            profile,
            output,
            with_report,
        } => cmd_export(&config, profile, output, with_report).await,
        Commands::Disclosure => {
            println!("{DISCLOSURE}");
            Ok(())
        }
        Commands::Config => cmd_config(&config),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("envprobe=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("envprobe=warn"))
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Pick the host to probe: an explicit profile, the configured profile, or
/// this machine.
fn load_provider(
    config: &Config,
    profile: Option<PathBuf>,
) -> Result<Arc<dyn EnvironmentProvider>> {
    match profile.or_else(|| config.profile_path.clone()) {
        Some(path) => {
            let host = HostProfile::load(&path)
                .with_context(|| format!("Could not load host profile {}", path.display()))?;
            tracing::debug!(path = %path.display(), "probing host profile");
            Ok(Arc::new(host))
        }
        None => native_provider(),
    }
}

#[cfg(feature = "native")]
fn native_provider() -> Result<Arc<dyn EnvironmentProvider>> {
    Ok(Arc::new(envprobe::env::NativeEnvironment::new()))
}

#[cfg(not(feature = "native"))]
fn native_provider() -> Result<Arc<dyn EnvironmentProvider>> {
    anyhow::bail!("No host profile given and native probing is not compiled in (enable the `native` feature)")
}

fn new_session(config: &Config, env: Arc<dyn EnvironmentProvider>) -> ProbeSession {
    ProbeSession::new(env).with_deadline(config.collection_timeout)
}

async fn cmd_scan(config: &Config, profile: Option<PathBuf>, json: bool, export: bool) -> Result<()> {
    let env = load_provider(config, profile)?;
    let mut session = new_session(config, env);

    if let Err(e) = session.refresh().await {
        tracing::debug!("pass failed: {e}");
        anyhow::bail!("{}", session.error().unwrap_or("collection failed"));
    }

    let (Some(snapshot), Some(report)) = (session.snapshot(), session.report()) else {
        anyhow::bail!("collection produced no snapshot");
    };

    if json {
        let combined = serde_json::json!({ "snapshot": snapshot, "report": report });
        println!("{}", serde_json::to_string_pretty(&combined)?);
    } else {
        print_report(snapshot, report);
    }

    if export {
        config.ensure_directories()?;
        for path in session.export(&config.export_path, true)? {
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

fn cmd_basic(config: &Config, profile: Option<PathBuf>) -> Result<()> {
    let env = load_provider(config, profile)?;
    let basic = collect_basic(env.as_ref());
    println!("{}", serde_json::to_string_pretty(&basic)?);
    Ok(())
}

async fn cmd_watch(config: &Config, profile: Option<PathBuf>, interval: Option<u64>) -> Result<()> {
    let env = load_provider(config, profile)?;
    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or(config.refresh_interval);
    let mut session = new_session(config, env);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;

    println!("envprobe v{VERSION}: watching every {}s", interval.as_secs());
    println!("Press Ctrl+C to stop");
    println!();

    let mut previous: Option<String> = None;
    while running.load(Ordering::SeqCst) {
        match session.refresh().await {
            Ok(()) => {
                if let Some(snapshot) = session.snapshot() {
                    let fingerprint = snapshot.fingerprint.clone().unwrap_or_default();
                    let drift = previous
                        .as_deref()
                        .map(|p| format!(" | similarity: {}%", similarity(p, &fingerprint)))
                        .unwrap_or_default();
                    println!(
                        "[{}] {} | privacy: {} | uniqueness: {}{}",
                        Utc::now().format("%H:%M:%S"),
                        fingerprint,
                        snapshot.privacy_score,
                        snapshot.uniqueness_score,
                        drift
                    );
                    previous = Some(fingerprint);
                }
            }
            Err(_) => {
                eprintln!(
                    "[{}] {}",
                    Utc::now().format("%H:%M:%S"),
                    session.error().unwrap_or("collection failed")
                );
            }
        }

        // Sleep in short steps so Ctrl+C is noticed promptly
        let mut slept = Duration::ZERO;
        while slept < interval && running.load(Ordering::SeqCst) {
            let step = Duration::from_millis(100).min(interval - slept);
            tokio::time::sleep(step).await;
            slept += step;
        }
    }

    println!();
    println!("{}", session.log().summary());
    Ok(())
}

async fn cmd_export(
    config: &Config,
    profile: Option<PathBuf>,
    output: Option<PathBuf>,
    with_report: bool,
) -> Result<()> {
    let env = load_provider(config, profile)?;
    let mut session = new_session(config, env);

    if session.refresh().await.is_err() {
        anyhow::bail!("{}", session.error().unwrap_or("collection failed"));
    }

    let dir = output.unwrap_or_else(|| config.export_path.clone());
    for path in session.export(&dir, with_report)? {
        println!("Exported to {}", path.display());
    }
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn print_report(snapshot: &Snapshot, report: &FingerprintReport) {
    println!("envprobe v{VERSION}");
    println!("================");
    println!();
    println!("Session:      {}", snapshot.session_id);
    println!("Collected at: {}", snapshot.collected_at.to_rfc3339());
    println!("Fingerprint:  {}", report.fingerprint);
    println!();
    println!(
        "Privacy score:    {:>3}/100 ({})",
        report.privacy_score, report.privacy_level
    );
    println!(
        "Uniqueness score: {:>3}/100 ({})",
        report.uniqueness_score, report.uniqueness_level
    );
    println!();

    let features = &report.privacy_features;
    println!("Privacy features:");
    for (label, active) in [
        ("Canvas blocked", features.canvas_blocked),
        ("Audio blocked", features.audio_blocked),
        ("Fonts limited", features.fonts_limited),
        ("Plugins limited", features.plugins_limited),
        ("Graphics blocked", features.graphics_blocked),
        ("Do Not Track", features.do_not_track),
        ("Private mode (heuristic)", features.private_mode),
    ] {
        println!("  {:<26} {}", label, if active { "yes" } else { "no" });
    }
    println!();

    if report.recommendations.is_empty() {
        println!("No recommendations.");
    } else {
        println!("Recommendations:");
        for recommendation in &report.recommendations {
            println!("  • {recommendation}");
        }
    }
    println!();

    println!("Data points: {}", report.data_points.total);
    for (category, count) in &report.data_points.categories {
        println!("  {:<12} {}", category.as_str(), count);
    }
}
