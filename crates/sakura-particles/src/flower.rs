//! Falling five-petal flowers

use crate::field::FrameContext;
use crate::palette::Palette;
use crate::rand::ParticleRng;
use crate::shapes::draw_flower;
use sakura_core::{DrawingSurface, Viewport};
use std::f32::consts::TAU;

/// Respawn height above the top edge
pub const FLOWER_SPAWN_Y: f32 = -60.0;
/// How far below the bottom edge a flower falls before it is recycled
pub const FLOWER_MARGIN: f32 = 80.0;
const WIND_DRIFT: f32 = 0.6;
const WIND_SPIN: f32 = 0.002;

#[derive(Clone, Debug, PartialEq)]
pub struct Flower {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub opacity: f32,
}

impl Flower {
    /// A flower placed anywhere on the surface
    pub fn spawn(rng: &mut ParticleRng, viewport: Viewport) -> Self {
        let mut flower = Self {
            x: 0.0,
            y: 0.0,
            size: 0.0,
            speed_x: 0.0,
            speed_y: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            opacity: 0.0,
        };
        flower.reset(rng, viewport, true);
        flower
    }

    /// Re-randomize in place; `random_height` scatters over the surface,
    /// otherwise the flower starts just above the top edge.
    pub fn reset(&mut self, rng: &mut ParticleRng, viewport: Viewport, random_height: bool) {
        self.x = rng.range(0.0, viewport.width);
        self.y = if random_height {
            rng.range(0.0, viewport.height)
        } else {
            FLOWER_SPAWN_Y
        };
        self.size = rng.range(0.4, 1.0);
        self.speed_y = rng.range(0.5, 0.8);
        self.speed_x = rng.range(-0.2, 0.2);
        self.rotation = rng.range(0.0, TAU);
        self.rotation_speed = rng.range(-0.005, 0.005);
        self.opacity = rng.range(0.6, 1.0);
    }

    pub fn update(&mut self, rng: &mut ParticleRng, ctx: &FrameContext) {
        self.y += self.speed_y;
        self.x += self.speed_x + ctx.wind * WIND_DRIFT;
        self.rotation += self.rotation_speed + ctx.wind * WIND_SPIN;

        if self.y > ctx.viewport.height + FLOWER_MARGIN {
            self.reset(rng, ctx.viewport, false);
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, palette: &Palette) {
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(self.rotation);
        surface.scale(self.size, self.size);
        draw_flower(surface, palette.petal, self.opacity);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::AvoidanceField;
    use sakura_core::RecordingSurface;

    fn ctx(wind: f32, viewport: Viewport) -> FrameContext {
        FrameContext {
            wind,
            avoidance: AvoidanceField::default().circle(viewport),
            viewport,
            time: 0.0,
        }
    }

    #[test]
    fn reset_above_top_edge() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = ParticleRng::new(1);
        let mut f = Flower::spawn(&mut rng, vp);
        for _ in 0..100 {
            f.reset(&mut rng, vp, false);
            assert!(f.y < 0.0);
            assert!((0.0..800.0).contains(&f.x));
        }
    }

    #[test]
    fn reset_random_height_on_surface() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = ParticleRng::new(2);
        let mut f = Flower::spawn(&mut rng, vp);
        for _ in 0..100 {
            f.reset(&mut rng, vp, true);
            assert!((0.0..600.0).contains(&f.y));
            assert!((0.4..1.0).contains(&f.size));
            assert!((0.5..0.8).contains(&f.speed_y));
            assert!((0.6..1.0).contains(&f.opacity));
            assert!((0.0..TAU).contains(&f.rotation));
        }
    }

    #[test]
    fn update_applies_wind() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = ParticleRng::new(3);
        let mut f = Flower::spawn(&mut rng, vp);
        f.y = 100.0;
        let (x0, y0, r0) = (f.x, f.y, f.rotation);
        f.update(&mut rng, &ctx(1.0, vp));
        assert!((f.y - (y0 + f.speed_y)).abs() < 1e-4);
        assert!((f.x - (x0 + f.speed_x + 0.6)).abs() < 1e-4);
        assert!((f.rotation - (r0 + f.rotation_speed + 0.002)).abs() < 1e-4);
    }

    #[test]
    fn recycles_below_margin() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = ParticleRng::new(4);
        let mut f = Flower::spawn(&mut rng, vp);
        f.y = 600.0 + FLOWER_MARGIN;
        f.speed_y = 0.5;
        f.update(&mut rng, &ctx(0.0, vp));
        assert_eq!(f.y, FLOWER_SPAWN_Y);
    }

    #[test]
    fn draw_is_balanced() {
        let vp = Viewport::new(800.0, 600.0);
        let mut rng = ParticleRng::new(5);
        let f = Flower::spawn(&mut rng, vp);
        let mut s = RecordingSurface::new();
        f.draw(&mut s, &Palette::default());
        assert_eq!(s.fill_count(), 6);
        assert_eq!(s.depth(), 0);
        assert_eq!(s.max_depth(), 2);
    }
}
