//! Blinking fireflies that wander, wrap around the edges, and shy away from
//! the moon

use crate::bounds::{ping_pong, wrap};
use crate::field::FrameContext;
use crate::palette::fixed;
use crate::rand::ParticleRng;
use sakura_core::{DrawingSurface, Glow, Vec2, Viewport};

const GLOW_BLUR: f32 = 15.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Firefly {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    /// Brightness in [0, 1]
    pub alpha: f32,
    /// Signed per-tick change of `alpha`
    pub alpha_speed: f32,
}

impl Firefly {
    pub fn spawn(rng: &mut ParticleRng, viewport: Viewport) -> Self {
        Self {
            x: rng.range(0.0, viewport.width),
            y: rng.range(0.0, viewport.height),
            radius: rng.range(1.0, 3.0),
            speed_x: rng.range(-0.15, 0.15),
            speed_y: rng.range(-0.15, 0.15),
            alpha: rng.next_f32(),
            alpha_speed: rng.range(0.005, 0.025),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        let moved = Vec2::new(self.x + self.speed_x, self.y + self.speed_y);
        let pushed = ctx.avoidance.repel(moved);

        (self.alpha, self.alpha_speed) = ping_pong(self.alpha, self.alpha_speed);

        self.x = wrap(pushed.x, ctx.viewport.width);
        self.y = wrap(pushed.y, ctx.viewport.height);
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        surface.fill_circle(
            self.position(),
            self.radius,
            fixed::FIREFLY.with_alpha(self.alpha),
            Some(Glow::new(GLOW_BLUR, fixed::FIREFLY_GLOW)),
        );
    }
}
