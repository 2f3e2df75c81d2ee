//! Headless scene-to-PNG render command

use super::{run_ticks, start_scene, Context};
use anyhow::{Context as _, Result};
use sakura_core::Viewport;
use sakura_particles::{Palette, SceneKind};
use sakura_render::Canvas;
use sakura_runtime::{StyleTokens, ThemeRegistry};
use std::path::PathBuf;

pub struct RenderArgs {
    pub scene: SceneKind,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub ticks: u32,
    pub seed: u32,
    pub theme: Option<String>,
    pub wind: Option<f32>,
    pub transparent: bool,
}

/// Tokens for `name`, warning when it falls back to the default palette
fn theme_style<'a>(themes: &'a ThemeRegistry, name: &str) -> &'a StyleTokens {
    if !themes.contains(name) {
        log::warn!("Unknown theme '{name}', using defaults");
    }
    themes.resolve(name)
}

pub fn run(context: &Context, args: RenderArgs) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("Image size must be non-zero, got {}x{}", args.width, args.height);
    }
    if args.scale.is_nan() || args.scale <= 0.0 {
        anyhow::bail!("Scale must be positive, got {}", args.scale);
    }

    let site = context.load_site()?;
    let theme = context.theme_name(args.theme)?;
    let style = theme_style(&site.themes, &theme);
    let palette = Palette::resolve(style);

    let viewport = Viewport::new(args.width as f32, args.height as f32);
    let mut canvas = Canvas::for_viewport(viewport, args.scale);
    let mut system = start_scene(args.scene, &site.scenes, args.seed, viewport, args.wind)?;

    println!(
        "Rendering {} for {} ticks at {}x{} ({}x scale)",
        args.scene, args.ticks, args.width, args.height, args.scale
    );
    run_ticks(system.as_mut(), &mut canvas, viewport, style, args.ticks, |_| {});
    system.shutdown()?;

    let background = (!args.transparent).then_some(palette.background);
    canvas
        .save_png(&args.output, background)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} ({}x{} pixels)",
        args.output.display(),
        canvas.width(),
        canvas.height()
    );
    Ok(())
}
