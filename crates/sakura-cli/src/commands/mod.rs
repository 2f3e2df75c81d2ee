pub mod countdown;
pub mod play;
pub mod prefs;
pub mod render;
pub mod simulate;
pub mod themes;

use anyhow::{Context as _, Result};
use sakura_core::{DrawingSurface, Viewport};
use sakura_particles::{SceneConfig, SceneKind, SkySystem};
use sakura_player::SiteConfig;
use sakura_runtime::{FrameInput, PreferenceStore, Preferences, RuntimeSystem, StyleTokens};
use std::path::PathBuf;

/// Headless runs advance at the display rate the scenes are tuned for
pub const TICK_MS: f64 = 1000.0 / 60.0;

/// Options shared by every subcommand
pub struct Context {
    pub site: PathBuf,
    pub prefs: Option<PathBuf>,
}

impl Context {
    pub fn load_site(&self) -> Result<SiteConfig> {
        SiteConfig::load_or_default(&self.site)
            .with_context(|| format!("Failed to load site file {}", self.site.display()))
    }

    pub fn open_store(&self) -> Result<PreferenceStore> {
        sakura_player::open_preferences(self.prefs.clone())
    }

    /// Theme to render with: the explicit name if given, else the saved one
    pub fn theme_name(&self, explicit: Option<String>) -> Result<String> {
        match explicit {
            Some(name) => Ok(name),
            None => Ok(Preferences::from_store(&self.open_store()?).theme),
        }
    }
}

/// Build and initialize a scene, seeding the sky's wind when asked
pub fn start_scene(
    kind: SceneKind,
    config: &SceneConfig,
    seed: u32,
    viewport: Viewport,
    wind: Option<f32>,
) -> Result<Box<dyn RuntimeSystem>> {
    let mut system: Box<dyn RuntimeSystem> = match (kind, wind) {
        (SceneKind::Sky, Some(amount)) => {
            let mut sky = SkySystem::new(config.sky.clone(), config.moon, seed);
            sky.wind_mut().add(amount);
            Box::new(sky)
        }
        (_, Some(_)) => {
            log::warn!("--wind only affects the sky scene");
            kind.build(config, seed)
        }
        (_, None) => kind.build(config, seed),
    };
    system
        .initialize(viewport)
        .with_context(|| format!("Failed to start scene '{kind}'"))?;
    Ok(system)
}

/// Tick `system` `ticks` times at 60 Hz, calling `after_tick` once per tick
pub fn run_ticks<S: DrawingSurface>(
    system: &mut dyn RuntimeSystem,
    surface: &mut S,
    viewport: Viewport,
    style: &StyleTokens,
    ticks: u32,
    mut after_tick: impl FnMut(&mut S),
) {
    for tick in 0..ticks {
        let frame = FrameInput {
            viewport,
            time: f64::from(tick) * TICK_MS / 1000.0,
            delta_ms: TICK_MS,
            style,
        };
        system.tick(surface, &frame);
        after_tick(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_core::RecordingSurface;
    use sakura_particles::title_glow;

    #[test]
    fn wind_seeds_the_sky() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut sky =
            start_scene(SceneKind::Sky, &SceneConfig::default(), 7, viewport, Some(0.1)).unwrap();
        let mut surface = RecordingSurface::new();
        run_ticks(sky.as_mut(), &mut surface, viewport, &StyleTokens::new(), 1, |_| {});
        assert!((sky.title_glow() - title_glow(0.1 * 0.95)).abs() < 1e-4);
    }

    #[test]
    fn wind_is_ignored_elsewhere() {
        let viewport = Viewport::new(800.0, 600.0);
        let lanterns =
            start_scene(SceneKind::Lanterns, &SceneConfig::default(), 7, viewport, Some(0.5))
                .unwrap();
        assert_eq!(lanterns.name(), "lanterns");
    }

    #[test]
    fn one_clear_per_tick() {
        let viewport = Viewport::new(640.0, 480.0);
        let mut system =
            start_scene(SceneKind::Sky, &SceneConfig::default(), 3, viewport, None).unwrap();
        let mut surface = RecordingSurface::new();
        let mut calls = 0;
        run_ticks(system.as_mut(), &mut surface, viewport, &StyleTokens::new(), 5, |_| {
            calls += 1
        });
        assert_eq!(calls, 5);
        assert_eq!(surface.clear_count(), 5);
    }
}
