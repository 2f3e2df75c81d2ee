//! Sakura CLI - Command-line interface for the Sakura scenes

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{countdown, play, prefs, render, simulate, themes};
use sakura_particles::SceneKind;
use sakura_player::DEFAULT_SITE_FILE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sakura")]
#[command(about = "Night-sky particle scenes: petals, fireflies, lanterns, and music notes", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to site file
    #[arg(long, global = true, default_value = DEFAULT_SITE_FILE)]
    site: PathBuf,

    /// Preference file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a scene in a window
    Play {
        /// Scene to open with
        #[arg(long, default_value = "sky")]
        scene: SceneKind,

        /// Run the simulation at a fixed tick rate instead of once per redraw
        #[arg(long)]
        fixed_hz: Option<f64>,

        /// Seed for reproducible particle layouts
        #[arg(long)]
        seed: Option<u32>,

        /// Launch in fullscreen mode
        #[arg(long)]
        fullscreen: bool,
    },

    /// Render a scene to a PNG after a number of ticks
    Render {
        /// Scene to render
        #[arg(long, default_value = "sky")]
        scene: SceneKind,

        /// Output file path
        #[arg(long, short, default_value = "sakura.png")]
        output: PathBuf,

        /// Image width in logical pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Image height in logical pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Device pixels per logical pixel
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// Ticks to run before capturing
        #[arg(long, default_value = "180")]
        ticks: u32,

        /// Particle seed
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Theme name (defaults to the saved preference)
        #[arg(long)]
        theme: Option<String>,

        /// Initial wind value before the first tick
        #[arg(long, allow_hyphen_values = true)]
        wind: Option<f32>,

        /// Leave the background transparent
        #[arg(long)]
        transparent: bool,
    },

    /// Run a scene headless and report what it did
    Simulate {
        /// Scene to run
        #[arg(long, default_value = "sky")]
        scene: SceneKind,

        /// Ticks to run
        #[arg(long, default_value = "600")]
        ticks: u32,

        /// Viewport width in logical pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Viewport height in logical pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Particle seed
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Initial wind value before the first tick
        #[arg(long, allow_hyphen_values = true)]
        wind: Option<f32>,
    },

    /// Saved theme and mute preferences
    #[command(subcommand)]
    Prefs(prefs::PrefsCommands),

    /// Print the time left until the event
    Countdown {
        /// Evaluate at this RFC 3339 instant instead of now
        #[arg(long)]
        now: Option<String>,
    },

    /// List registered themes and their colour tokens
    Themes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    sakura_player::init_logging(cli.verbose);

    let context = commands::Context {
        site: cli.site,
        prefs: cli.prefs,
    };

    match cli.command {
        Commands::Play {
            scene,
            fixed_hz,
            seed,
            fullscreen,
        } => play::run(
            &context,
            play::PlayArgs {
                scene,
                fixed_hz,
                seed,
                fullscreen,
            },
        ),
        Commands::Render {
            scene,
            output,
            width,
            height,
            scale,
            ticks,
            seed,
            theme,
            wind,
            transparent,
        } => render::run(
            &context,
            render::RenderArgs {
                scene,
                output,
                width,
                height,
                scale,
                ticks,
                seed,
                theme,
                wind,
                transparent,
            },
        ),
        Commands::Simulate {
            scene,
            ticks,
            width,
            height,
            seed,
            wind,
        } => simulate::run(
            &context,
            simulate::SimulateArgs {
                scene,
                ticks,
                width,
                height,
                seed,
                wind,
            },
        ),
        Commands::Prefs(cmd) => prefs::run(&context, cmd),
        Commands::Countdown { now } => countdown::run(&context, now.as_deref()),
        Commands::Themes => themes::run(&context),
    }
}
