//! Sakura Player - animated invitation scenes in a window
//!
//! Usage:
//!   sakura-player [site.toml] [--scene sky|lanterns|music_box] [--fixed-hz <hz>]

use anyhow::{Context, Result};
use clap::Parser;
use sakura_particles::SceneKind;
use sakura_player::{PlayerOptions, SiteConfig, DEFAULT_SITE_FILE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sakura-player")]
#[command(about = "Sakura player - falling petals, lanterns, and music notes under the moon")]
#[command(version)]
struct Args {
    /// Path to site file
    #[arg(default_value = DEFAULT_SITE_FILE)]
    site: PathBuf,

    /// Scene to open with
    #[arg(long, default_value = "sky")]
    scene: SceneKind,

    /// Run the simulation at a fixed tick rate instead of once per redraw
    #[arg(long)]
    fixed_hz: Option<f64>,

    /// Seed for reproducible particle layouts
    #[arg(long)]
    seed: Option<u32>,

    /// Preference file (defaults to the per-user config directory)
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    sakura_player::init_logging(args.verbose);

    let site = SiteConfig::load_or_default(&args.site)
        .with_context(|| format!("Failed to load site file {}", args.site.display()))?;
    let store = sakura_player::open_preferences(args.prefs)?;

    println!("Controls:");
    println!("  1/2/3    - Sky / Lanterns / Music box");
    println!("  T        - Cycle theme");
    println!("  M        - Toggle music");
    println!("  Escape   - Exit");

    sakura_player::run(
        site,
        store,
        PlayerOptions {
            scene: args.scene,
            fixed_hz: args.fixed_hz,
            fullscreen: args.fullscreen,
            seed: args.seed,
        },
    )
}
