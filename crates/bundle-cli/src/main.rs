//! Bundle Mirror CLI
//!
//! Placed next to a bundle's files, `bundle-sync` mirrors the bundle into a
//! writable directory and starts the bundle's entry program from there.

mod cli;
mod error;

use std::path::{Path, PathBuf};

use bundle_core::{EntryState, SyncEngine, WrapperConfig};
use bundle_fs::BundlePath;
use clap::Parser;
use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let exe_dir = executable_dir();
    let source_root = match (&cli.source, &exe_dir) {
        (Some(source), _) => source.clone(),
        (None, Some(dir)) => dir.clone(),
        (None, None) => std::env::current_dir()?,
    };
    let config_path = cli.config.clone().unwrap_or_else(|| {
        exe_dir
            .as_deref()
            .unwrap_or(&source_root)
            .join(BundlePath::ConfigFile)
    });

    // The subscriber depends on the configured level, so a config problem
    // is reported only once it is installed
    let (mut config, config_error) = match WrapperConfig::load(&config_path) {
        Ok(found) => (found.unwrap_or_default(), None),
        Err(e) => (WrapperConfig::default(), Some(e)),
    };
    config.merge(&cli.overrides());
    let resolved = config.resolve(source_root)?;

    init_tracing(&resolved.log_level);
    if let Some(e) = config_error {
        tracing::warn!("{}, using defaults", e);
    }
    tracing::info!("Log level: {}", resolved.log_level);

    let engine = SyncEngine::new(resolved.request);
    let outcome = engine.run()?;

    if let EntryState::Ready(plan) = outcome.entry {
        let launched = bundle_launch::launch(&plan, engine.request().launch_mode)?;
        return Ok(launched.exit_code());
    }

    if let Err(e) = engine.reap() {
        tracing::warn!("Failed to clean up destination directory: {}", e);
    }
    tracing::info!("Sync wrapper completed");
    Ok(0)
}

/// Directory holding the running executable, if it can be determined.
fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Install a stderr subscriber at `log_level`. `RUST_LOG` takes precedence.
fn init_tracing(log_level: &str) {
    let level = parse_level(log_level);
    let filter = EnvFilter::builder()
        .with_default_directive(level.unwrap_or(LevelFilter::INFO).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: failed to install log subscriber: {}", "warning".yellow(), e);
        return;
    }

    if level.is_none() {
        tracing::warn!("Unknown log level '{}', using info", log_level);
    }
}

fn parse_level(log_level: &str) -> Option<LevelFilter> {
    match log_level.trim().to_ascii_lowercase().as_str() {
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None,
    }
}
