//! Shooting stars: short-lived streaks that fade out and are discarded

use crate::palette::fixed;
use crate::pool::Transient;
use crate::rand::ParticleRng;
use sakura_core::{DrawingSurface, Path, Vec2, Viewport};
use std::f32::consts::FRAC_PI_4;

/// Alpha lost per tick
pub const STAR_FADE: f32 = 0.015;
const TRAIL_WIDTH: f32 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub speed: f32,
    pub angle: f32,
    pub alpha: f32,
}

impl ShootingStar {
    /// A new star in the upper-left part of the sky
    pub fn spawn(rng: &mut ParticleRng, viewport: Viewport) -> Self {
        Self {
            x: rng.range(0.0, viewport.width * 0.6),
            y: rng.range(0.0, viewport.height * 0.4),
            length: rng.range(150.0, 350.0),
            speed: rng.range(4.0, 10.0),
            angle: FRAC_PI_4,
            alpha: 1.0,
        }
    }

    pub fn update(&mut self) {
        let step = Vec2::from_angle(self.angle) * self.speed;
        self.x += step.x;
        self.y += step.y;
        self.alpha -= STAR_FADE;
    }

    /// Head of the streak
    pub fn head(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// End of the trail, `length` behind the head
    pub fn tail(&self) -> Vec2 {
        self.head() - Vec2::from_angle(self.angle) * self.length
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        surface.save();
        surface.set_global_alpha(self.alpha);
        surface.stroke_path(
            &Path::line(self.head(), self.tail()),
            fixed::STAR_TRAIL,
            TRAIL_WIDTH,
        );
        surface.restore();
    }
}

impl Transient for ShootingStar {
    fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}
