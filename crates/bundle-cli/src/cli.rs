//! CLI argument parsing using clap derive

use std::path::PathBuf;

use bundle_core::WrapperConfig;
use bundle_launch::{LaunchError, LaunchMode};
use clap::Parser;

/// Bundle Mirror - copy a read-only bundle to a writable location and run it
///
/// Every option can also be set in `wrapper.config.json` next to the
/// executable; flags given here take precedence over the file.
#[derive(Parser, Debug, Default)]
#[command(name = "bundle-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Destination directory
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Subdirectory of the destination to mirror into
    #[arg(long)]
    pub name: Option<String>,

    /// Force sync even when the version stamp matches
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub force: Option<bool>,

    /// Log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Entry program, relative to the bundle or its mirror
    #[arg(long)]
    pub entry: Option<PathBuf>,

    /// Mirror the bundle into the destination before launching
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub copy: Option<bool>,

    /// Launch discipline for the entry program (detach or wait)
    #[arg(long, value_parser = parse_launch_mode)]
    pub launch_mode: Option<LaunchMode>,

    /// Maximum number of concurrent file copies
    #[arg(long)]
    pub workers: Option<usize>,

    /// Bundle directory to mirror [default: directory of this executable]
    #[arg(long, env = "BUNDLE_SYNC_SOURCE")]
    pub source: Option<PathBuf>,

    /// Configuration file [default: wrapper.config.json next to this executable]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The flag layer, for merging over the configuration file.
    pub fn overrides(&self) -> WrapperConfig {
        WrapperConfig {
            dest: self.dest.clone(),
            name: self.name.clone(),
            force: self.force,
            log_level: self.log_level.clone(),
            entry: self.entry.clone(),
            copy: self.copy,
            launch_mode: self.launch_mode,
            workers: self.workers,
        }
    }
}

fn parse_launch_mode(value: &str) -> std::result::Result<LaunchMode, String> {
    value.parse().map_err(|e: LaunchError| e.to_string())
}
