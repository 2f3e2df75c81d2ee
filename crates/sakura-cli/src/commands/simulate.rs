//! Headless simulation against a recording surface

use super::{run_ticks, Context};
use anyhow::Result;
use sakura_core::{RecordingSurface, Viewport};
use sakura_particles::{LanternSystem, MusicBoxSystem, SceneKind, SkySystem};
use sakura_runtime::{RuntimeSystem, StyleTokens};

pub struct SimulateArgs {
    pub scene: SceneKind,
    pub ticks: u32,
    pub width: u32,
    pub height: u32,
    pub seed: u32,
    pub wind: Option<f32>,
}

/// Draw calls seen over a run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OpTotals {
    pub fills: usize,
    pub strokes: usize,
    pub clears: usize,
    pub max_depth: usize,
    pub unbalanced_restores: usize,
}

impl OpTotals {
    /// Count the ops recorded since the last call and discard them
    fn absorb(&mut self, surface: &mut RecordingSurface) {
        self.fills += surface.fill_count();
        self.strokes += surface.stroke_count();
        self.clears += surface.clear_count();
        self.max_depth = self.max_depth.max(surface.max_depth());
        self.unbalanced_restores = surface.unbalanced_restores();
        surface.take_ops();
    }
}

/// Run `system` headless for `ticks` ticks and total its draw calls
pub fn record(
    system: &mut dyn RuntimeSystem,
    viewport: Viewport,
    style: &StyleTokens,
    ticks: u32,
) -> OpTotals {
    let mut surface = RecordingSurface::new();
    let mut totals = OpTotals::default();
    run_ticks(system, &mut surface, viewport, style, ticks, |s| totals.absorb(s));
    totals
}

pub fn run(context: &Context, args: SimulateArgs) -> Result<()> {
    let site = context.load_site()?;
    let theme = context.theme_name(None)?;
    let style = site.themes.resolve(&theme);
    let viewport = Viewport::new(args.width as f32, args.height as f32);
    let scenes = &site.scenes;

    println!("Scene:    {}", args.scene);
    println!("Viewport: {}x{}", args.width, args.height);
    println!("Ticks:    {}", args.ticks);
    println!("Seed:     {}", args.seed);
    println!();

    let totals = match args.scene {
        SceneKind::Sky => {
            let mut sky = SkySystem::new(scenes.sky.clone(), scenes.moon, args.seed);
            sky.initialize(viewport)?;
            if let Some(amount) = args.wind {
                sky.wind_mut().add(amount);
            }
            let totals = record(&mut sky, viewport, style, args.ticks);
            let stats = sky.stats();
            println!("Flowers:        {}", sky.flowers().len());
            println!("Petals:         {}", sky.petals().len());
            println!("Fireflies:      {}", sky.fireflies().len());
            println!(
                "Shooting stars: {} live, {} spawned, {} removed, {} dropped (cap {})",
                sky.stars().len(),
                stats.stars_spawned,
                stats.stars_removed,
                stats.stars_dropped,
                sky.stars().capacity()
            );
            println!("Wind:           {:.5}", sky.wind().value());
            println!("Title glow:     {:.2}", sky.current_title_glow());
            totals
        }
        SceneKind::Lanterns => {
            let mut lanterns = LanternSystem::new(scenes.lanterns.clone(), args.seed);
            lanterns.initialize(viewport)?;
            let totals = record(&mut lanterns, viewport, style, args.ticks);
            println!("Lanterns:       {}", lanterns.lanterns().len());
            println!("Range x:        {}", lanterns.range_x(viewport));
            totals
        }
        SceneKind::MusicBox => {
            let mut music_box = MusicBoxSystem::new(scenes.music_box.clone(), args.seed);
            music_box.initialize(viewport)?;
            let totals = record(&mut music_box, viewport, style, args.ticks);
            println!(
                "Notes:          {} live (cap {})",
                music_box.notes().len(),
                music_box.notes().capacity()
            );
            totals
        }
    };

    println!();
    println!(
        "Draw ops:       {} fills, {} strokes, {} clears",
        totals.fills, totals.strokes, totals.clears
    );
    println!(
        "State stack:    max depth {}, {} unbalanced restores",
        totals.max_depth, totals.unbalanced_restores
    );
    if args.wind.is_some() && args.scene != SceneKind::Sky {
        println!("Note: --wind only affects the sky scene");
    }
    Ok(())
}
