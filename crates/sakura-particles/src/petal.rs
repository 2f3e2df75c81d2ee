//! Single falling petals, lighter and more wind-driven than flowers

use crate::field::FrameContext;
use crate::palette::Palette;
use crate::rand::ParticleRng;
use crate::shapes::draw_petal;
use sakura_core::{DrawingSurface, Viewport};
use std::f32::consts::PI;

pub const PETAL_SPAWN_Y: f32 = -30.0;
pub const PETAL_MARGIN: f32 = 40.0;
const WIND_LIFT: f32 = 0.1;
const WIND_SPIN: f32 = 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct Petal {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub opacity: f32,
}

impl Petal {
    pub fn spawn(rng: &mut ParticleRng, viewport: Viewport) -> Self {
        let mut petal = Self {
            x: 0.0,
            y: 0.0,
            size: 0.0,
            speed_x: 0.0,
            speed_y: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            opacity: 0.0,
        };
        petal.reset(rng, viewport, true);
        petal
    }

    pub fn reset(&mut self, rng: &mut ParticleRng, viewport: Viewport, random_height: bool) {
        self.x = rng.range(0.0, viewport.width);
        self.y = if random_height {
            rng.range(0.0, viewport.height)
        } else {
            PETAL_SPAWN_Y
        };
        self.size = rng.range(0.4, 0.9);
        self.speed_y = rng.range(0.8, 1.3);
        self.speed_x = rng.range(-0.3, 0.3);
        self.rotation = rng.range(0.0, PI);
        self.rotation_speed = rng.range(-0.01, 0.01);
        self.opacity = rng.range(0.5, 0.9);
    }

    /// Strong wind of either sign slows the fall
    pub fn update(&mut self, rng: &mut ParticleRng, ctx: &FrameContext) {
        self.y += self.speed_y - ctx.wind.abs() * WIND_LIFT;
        self.x += self.speed_x + ctx.wind;
        self.rotation += self.rotation_speed + ctx.wind * WIND_SPIN;

        if self.y > ctx.viewport.height + PETAL_MARGIN {
            self.reset(rng, ctx.viewport, false);
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, palette: &Palette) {
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(self.rotation);
        surface.scale(self.size, self.size);
        draw_petal(surface, palette.petal, self.opacity);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::AvoidanceField;
    use sakura_core::{DrawOp, RecordingSurface};

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
        let vp = Viewport::new(1024.0, 768.0);
        let mut rng = ParticleRng::new(10);
        let mut p = Petal::spawn(&mut rng, vp);
        for _ in 0..100 {
            p.reset(&mut rng, vp, false);
            assert!(p.y < 0.0);
        }
    }

    #[test]
    fn reset_random_height_on_surface() {
        let vp = Viewport::new(1024.0, 768.0);
        let mut rng = ParticleRng::new(11);
        let mut p = Petal::spawn(&mut rng, vp);
        for _ in 0..100 {
            p.reset(&mut rng, vp, true);
            assert!((0.0..768.0).contains(&p.y));
            assert!((0.0..PI).contains(&p.rotation));
            assert!((0.8..1.3).contains(&p.speed_y));
            assert!((0.5..0.9).contains(&p.opacity));
        }
    }

    #[test]
    fn wind_of_either_sign_slows_fall() {
        let vp = Viewport::new(1024.0, 768.0);
        let mut rng = ParticleRng::new(12);
        let mut a = Petal::spawn(&mut rng, vp);
        a.y = 100.0;
        let mut b = a.clone();
        a.update(&mut rng, &ctx(2.0, vp));
        b.update(&mut rng, &ctx(-2.0, vp));
        let expected = 100.0 + a.speed_y - 0.2;
        assert!((a.y - expected).abs() < 1e-4);
        assert!((b.y - expected).abs() < 1e-4);
        assert!(a.x > b.x);
    }

    #[test]
    fn recycles_below_margin() {
        let vp = Viewport::new(1024.0, 768.0);
        let mut rng = ParticleRng::new(13);
        let mut p = Petal::spawn(&mut rng, vp);
        p.y = 768.0 + PETAL_MARGIN;
        p.update(&mut rng, &ctx(0.0, vp));
        assert_eq!(p.y, PETAL_SPAWN_Y);
    }

    #[test]
    fn draw_uses_theme_petal_colour() {
        let vp = Viewport::new(1024.0, 768.0);
        let mut rng = ParticleRng::new(14);
        let p = Petal::spawn(&mut rng, vp);
        let mut s = RecordingSurface::new();
        p.draw(&mut s, &Palette::default());
        match &s.ops()[0] {
            DrawOp::Fill { origin, color, .. } => {
                assert_eq!(&color.to_rgba8()[..3], &[255, 183, 197]);
                assert!((color.a - p.opacity).abs() < 1e-6);
                assert!((origin.x - p.x).abs() < 1e-3 && (origin.y - p.y).abs() < 1e-3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
