//! Sakura Player - windowed scene player library
//!
//! This crate provides the `PlayerApp` application handler, the site file
//! loader, and the small amount of startup glue shared by the
//! `sakura-player` binary and `sakura play`.

mod overlay;
mod player_app;
pub mod site;

pub use player_app::{PlayerApp, PlayerOptions};
pub use site::{SiteConfig, DEFAULT_SITE_FILE};

use anyhow::Context;
use sakura_runtime::PreferenceStore;
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

/// Install `env_logger`: `warn` by default, each `-v` one level chattier.
/// `RUST_LOG` still wins when set.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Open the preference file at `path`, or the per-user default location
pub fn open_preferences(path: Option<PathBuf>) -> anyhow::Result<PreferenceStore> {
    match path.or_else(PreferenceStore::default_path) {
        Some(path) => PreferenceStore::open(path).context("Failed to read preferences"),
        None => {
            log::warn!("[player] no config directory, preferences will not persist");
            Ok(PreferenceStore::new())
        }
    }
}

/// Open a window and run until it is closed
pub fn run(site: SiteConfig, store: PreferenceStore, options: PlayerOptions) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PlayerApp::new(site, store, options);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
