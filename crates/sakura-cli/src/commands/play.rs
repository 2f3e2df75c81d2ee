//! Play command - opens the windowed player

use super::Context;
use anyhow::Result;
use sakura_particles::SceneKind;
use sakura_player::PlayerOptions;

pub struct PlayArgs {
    pub scene: SceneKind,
    pub fixed_hz: Option<f64>,
    pub seed: Option<u32>,
    pub fullscreen: bool,
}

pub fn run(context: &Context, args: PlayArgs) -> Result<()> {
    let site = context.load_site()?;
    let store = context.open_store()?;

    println!("Scene: {}", args.scene);
    if let Some(hz) = args.fixed_hz {
        println!("Fixed rate: {hz} Hz");
    }
    println!();
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
