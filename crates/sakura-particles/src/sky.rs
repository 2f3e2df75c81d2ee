//! The night-sky scene: falling flowers and petals, fireflies, and the
//! occasional shooting star, all pushed around by one wind scalar

use crate::config::SkyConfig;
use crate::field::{AvoidanceField, FrameContext, WindField};
use crate::firefly::Firefly;
use crate::flower::Flower;
use crate::palette::Palette;
use crate::petal::Petal;
use crate::pool::{FixedPool, Transient, TransientPool};
use crate::rand::ParticleRng;
use crate::shooting_star::ShootingStar;
use sakura_core::{DrawingSurface, Result, Viewport};
use sakura_runtime::{FrameInput, RuntimeSystem};

/// Blur radius of the title halo for a given wind, capped at 35
pub fn title_glow(wind: f32) -> f32 {
    (wind.abs() * 220.0).min(35.0)
}

/// Counters collected while the scene runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkyStats {
    pub ticks: u64,
    pub stars_spawned: u64,
    pub stars_removed: u64,
    /// Spawns lost because the star pool was full
    pub stars_dropped: u64,
}

pub struct SkySystem {
    config: SkyConfig,
    rng: ParticleRng,
    wind: WindField,
    moon: AvoidanceField,
    flowers: FixedPool<Flower>,
    petals: FixedPool<Petal>,
    fireflies: FixedPool<Firefly>,
    stars: TransientPool<ShootingStar>,
    title_glow: f32,
    stats: SkyStats,
}

impl SkySystem {
    pub fn new(config: SkyConfig, moon: AvoidanceField, seed: u32) -> Self {
        let wind = WindField::new(config.wind_strength, config.wind_decay);
        let stars = TransientPool::new(config.max_shooting_stars);
        Self {
            config,
            rng: ParticleRng::new(seed),
            wind,
            moon,
            flowers: FixedPool::default(),
            petals: FixedPool::default(),
            fireflies: FixedPool::default(),
            stars,
            title_glow: 0.0,
            stats: SkyStats::default(),
        }
    }

    /// Populate every fixed pool for `viewport`, discarding any previous
    /// particles
    pub fn populate(&mut self, viewport: Viewport) {
        let rng = &mut self.rng;
        self.flowers = FixedPool::from_fn(self.config.flower_count, || Flower::spawn(rng, viewport));
        self.petals = FixedPool::from_fn(self.config.petal_count, || Petal::spawn(rng, viewport));
        self.fireflies =
            FixedPool::from_fn(self.config.firefly_count, || Firefly::spawn(rng, viewport));
        self.stars.clear();
    }

    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    pub fn wind_mut(&mut self) -> &mut WindField {
        &mut self.wind
    }

    pub fn flowers(&self) -> &FixedPool<Flower> {
        &self.flowers
    }

    pub fn petals(&self) -> &FixedPool<Petal> {
        &self.petals
    }

    pub fn fireflies(&self) -> &FixedPool<Firefly> {
        &self.fireflies
    }

    pub fn stars(&self) -> &TransientPool<ShootingStar> {
        &self.stars
    }

    pub fn stats(&self) -> SkyStats {
        self.stats
    }

    /// Title halo for the most recent tick
    pub fn current_title_glow(&self) -> f32 {
        self.title_glow
    }

    /// One frame: clear, decay wind, maybe spawn a star, then update and draw
    /// stars, fireflies, flowers, and petals in that order.
    pub fn step(
        &mut self,
        surface: &mut dyn DrawingSurface,
        viewport: Viewport,
        palette: &Palette,
        time: f32,
    ) {
        surface.clear_rect(viewport.bounds());

        self.wind.decay();
        self.title_glow = title_glow(self.wind.value());

        let ctx = FrameContext {
            wind: self.wind.value(),
            avoidance: self.moon.circle(viewport),
            viewport,
            time,
        };

        if self.rng.chance(self.config.shooting_star_chance) {
            if self.stars.push(ShootingStar::spawn(&mut self.rng, viewport)) {
                self.stats.stars_spawned += 1;
            } else {
                self.stats.stars_dropped += 1;
                log::debug!(
                    "[sky] shooting star pool full ({}), spawn dropped",
                    self.stars.capacity()
                );
            }
        }

        for star in self.stars.iter_mut() {
            star.update();
            if star.is_alive() {
                star.draw(surface);
            }
        }
        self.stats.stars_removed += self.stars.prune() as u64;

        for firefly in self.fireflies.iter_mut() {
            firefly.update(&ctx);
            firefly.draw(surface);
        }

        for flower in self.flowers.iter_mut() {
            flower.update(&mut self.rng, &ctx);
            flower.draw(surface, palette);
        }

        for petal in self.petals.iter_mut() {
            petal.update(&mut self.rng, &ctx);
            petal.draw(surface, palette);
        }

        self.stats.ticks += 1;
    }
}

impl RuntimeSystem for SkySystem {
    fn initialize(&mut self, viewport: Viewport) -> Result<()> {
        self.populate(viewport);
        log::info!(
            "[sky] {} flowers, {} petals, {} fireflies",
            self.flowers.len(),
            self.petals.len(),
            self.fireflies.len()
        );
        Ok(())
    }

    fn pointer_moved(&mut self, x: f32, viewport: Viewport) {
        self.wind.impulse(x, viewport);
    }

    fn tick(&mut self, surface: &mut dyn DrawingSurface, frame: &FrameInput<'_>) {
        let palette = Palette::resolve(frame.style);
        self.step(surface, frame.viewport, &palette, frame.time as f32);
    }

    fn title_glow(&self) -> f32 {
        self.title_glow
    }

    fn name(&self) -> &str {
        "sky"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flower::FLOWER_MARGIN;
    use crate::petal::PETAL_MARGIN;
    use sakura_core::{DrawOp, RecordingSurface};

    fn sky(config: SkyConfig, viewport: Viewport) -> SkySystem {
        let mut sky = SkySystem::new(config, AvoidanceField::default(), 1234);
        sky.initialize(viewport).unwrap();
        sky
    }

    #[test]
    fn title_glow_caps() {
        assert_eq!(title_glow(0.0), 0.0);
        assert!((title_glow(-0.1) - 22.0).abs() < 1e-4);
        assert_eq!(title_glow(1.0), 35.0);
    }

    #[test]
    fn pools_filled_on_initialize() {
        let s = sky(SkyConfig::default(), Viewport::new(1280.0, 720.0));
        assert_eq!(s.flowers().len(), 45);
        assert_eq!(s.petals().len(), 120);
        assert_eq!(s.fireflies().len(), 40);
        assert!(s.stars().is_empty());
    }

    #[test]
    fn frame_order_is_clear_stars_fireflies_flowers_petals() {
        let config = SkyConfig {
            flower_count: 1,
            petal_count: 1,
            firefly_count: 1,
            shooting_star_chance: 1.0,
            ..SkyConfig::default()
        };
        let vp = Viewport::new(1280.0, 720.0);
        let mut s = sky(config, vp);
        let mut surface = RecordingSurface::new();
        s.step(&mut surface, vp, &Palette::default(), 0.0);

        let ops = surface.ops();
        assert!(matches!(ops[0], DrawOp::Clear(r) if r == vp.bounds()));
        assert!(matches!(ops[1], DrawOp::Stroke { .. }));
        assert!(matches!(ops[2], DrawOp::Fill { glow: Some(_), .. }));
        // Flower: five petals and a center, then the lone petal
        assert_eq!(ops.len(), 3 + 6 + 1);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn wind_decays_before_particles_move() {
        let vp = Viewport::new(1280.0, 720.0);
        let mut s = sky(SkyConfig::default(), vp);
        s.wind_mut().add(1.0);
        let mut surface = RecordingSurface::new();
        s.step(&mut surface, vp, &Palette::default(), 0.0);
        assert!((s.wind().value() - 0.95).abs() < 1e-6);
        assert_eq!(s.current_title_glow(), 35.0);
    }

    #[test]
    fn wind_follows_geometric_decay() {
        let vp = Viewport::new(1280.0, 720.0);
        let mut s = sky(SkyConfig::default(), vp);
        s.pointer_moved(1280.0, vp);
        let impulse = s.wind().value();
        assert!(impulse > 0.0);
        let mut surface = RecordingSurface::new();
        for n in 1..=300 {
            s.step(&mut surface, vp, &Palette::default(), 0.0);
            surface.take_ops();
            let expected = impulse * 0.95f32.powi(n);
            assert!((s.wind().value() - expected).abs() <= expected * 1e-4);
            assert!(s.wind().value() >= 0.0);
        }
    }

    #[test]
    fn stars_are_removed_on_tick_67() {
        let config = SkyConfig {
            flower_count: 0,
            petal_count: 0,
            firefly_count: 0,
            shooting_star_chance: 1.0,
            ..SkyConfig::default()
        };
        let vp = Viewport::new(1280.0, 720.0);
        let mut s = sky(config, vp);
        let mut surface = RecordingSurface::new();

        // The first star is spawned and updated on tick 1
        s.step(&mut surface, vp, &Palette::default(), 0.0);
        s.config.shooting_star_chance = 0.0;
        for _ in 2..=66 {
            s.step(&mut surface, vp, &Palette::default(), 0.0);
        }
        assert_eq!(s.stars().len(), 1);
        assert_eq!(s.stats().stars_removed, 0);

        s.step(&mut surface, vp, &Palette::default(), 0.0);
        assert!(s.stars().is_empty());
        assert_eq!(s.stats().stars_removed, 1);
        assert_eq!(s.stats().stars_spawned, 1);
    }

    #[test]
    fn full_star_pool_drops_and_counts_spawns() {
        let config = SkyConfig {
            flower_count: 0,
            petal_count: 0,
            firefly_count: 0,
            max_shooting_stars: 2,
            shooting_star_chance: 1.0,
            ..SkyConfig::default()
        };
        let vp = Viewport::new(1280.0, 720.0);
        let mut s = sky(config, vp);
        let mut surface = RecordingSurface::new();
        for _ in 0..5 {
            s.step(&mut surface, vp, &Palette::default(), 0.0);
        }
        assert_eq!(s.stars().len(), 2);
        assert_eq!(s.stats().stars_spawned, 2);
        assert_eq!(s.stats().stars_dropped, 3);
    }

    #[test]
    fn fireflies_stay_on_surface_through_resize() {
        let mut s = sky(SkyConfig::default(), Viewport::new(1280.0, 720.0));
        let small = Viewport::new(400.0, 300.0);
        let mut surface = RecordingSurface::new();
        for _ in 0..500 {
            s.step(&mut surface, small, &Palette::default(), 0.0);
            surface.take_ops();
            for f in s.fireflies().iter() {
                assert!((0.0..400.0).contains(&f.x));
                assert!((0.0..300.0).contains(&f.y));
                assert!((0.0..=1.0).contains(&f.alpha));
            }
        }
    }

    #[test]
    fn ten_thousand_calm_ticks_stay_bounded() {
        let config = SkyConfig {
            firefly_count: 0,
            shooting_star_chance: 0.0,
            ..SkyConfig::default()
        };
        let vp = Viewport::new(1280.0, 720.0);
        let mut s = sky(config, vp);
        let mut surface = RecordingSurface::new();
        for _ in 0..10_000 {
            s.step(&mut surface, vp, &Palette::default(), 0.0);
            surface.take_ops();
            for f in s.flowers().iter() {
                assert!(f.y >= -FLOWER_MARGIN && f.y <= vp.height + FLOWER_MARGIN);
            }
            for p in s.petals().iter() {
                assert!(p.y >= -PETAL_MARGIN && p.y <= vp.height + PETAL_MARGIN);
            }
        }
        assert_eq!((s.flowers().len(), s.petals().len()), (45, 120));
        assert_eq!(s.stats().ticks, 10_000);
    }
}
