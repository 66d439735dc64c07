#![deny(unsafe_code)]

//! synctray: a tray companion for the Syncthing daemon.
//!
//! Reads the daemon's own config for its address and API key, shows the
//! daemon version, and offers Open web interface, Restart, Shutdown and Quit.
//! The terminal UI is the default frontend; `--tray` selects the native
//! system tray where the binary was built with the `tray` feature.

mod app;
mod keymap;
mod panels;
mod terminal;
#[cfg(all(feature = "tray", any(windows, target_os = "macos")))]
mod tray;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use synctray_config::{ConfigResolver, Settings};
use tracing_subscriber::EnvFilter;

/// Tray companion for the Syncthing daemon.
#[derive(Parser, Debug)]
#[command(name = "synctray", version, about, long_about = None)]
struct Cli {
    /// Path to the synctray settings file (used only if it exists).
    #[arg(short, long, default_value = "synctray.toml")]
    config: PathBuf,

    /// Path to the daemon's config.xml, overriding the settings file and the
    /// default per-user location.
    #[arg(long, value_name = "PATH")]
    daemon_config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use the native system tray instead of the terminal UI.
    #[arg(long)]
    tray: bool,
}

impl Cli {
    fn log_filter(&self, settings: &Settings) -> EnvFilter {
        let level = match self.verbose {
            0 => settings.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }

    /// `--daemon-config` wins over the settings file, which wins over the
    /// daemon's default location.
    fn resolver(&self, settings: &Settings) -> ConfigResolver {
        match &self.daemon_config {
            Some(path) => ConfigResolver::with_config_file(path),
            None => settings.resolver(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config).await?;
    let filter = cli.log_filter(&settings);
    let resolver = cli.resolver(&settings);

    if cli.tray {
        run_tray(filter, resolver)
    } else {
        terminal::run(filter, resolver).await
    }
}

async fn load_settings(path: &Path) -> Result<Settings> {
    if path.exists() {
        Settings::load(path)
            .await
            .with_context(|| format!("failed to load settings from {}", path.display()))
    } else {
        Ok(Settings::default())
    }
}

#[cfg(all(feature = "tray", any(windows, target_os = "macos")))]
fn run_tray(filter: EnvFilter, resolver: ConfigResolver) -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tray::run(resolver)
}

#[cfg(not(all(feature = "tray", any(windows, target_os = "macos"))))]
fn run_tray(_filter: EnvFilter, _resolver: ConfigResolver) -> Result<()> {
    anyhow::bail!(
        "native tray support is not available in this build; \
         it requires the `tray` feature on Windows or macOS"
    )
}
