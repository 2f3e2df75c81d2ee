//! Butterfly burst: a one-shot flight of butterflies from the middle of the
//! viewport out past a random edge
//!
//! Unlike the scenes this is not a `RuntimeSystem`; the player triggers it on
//! demand and draws it over whatever scene is running.

use crate::pool::{Transient, TransientPool};
use crate::rand::ParticleRng;
use sakura_core::{DrawingSurface, Path, Rgba, Vec2, Viewport};
use std::f32::consts::FRAC_PI_2;

pub const BUTTERFLY_COUNT: usize = 12;
/// Delay between successive launches
pub const STAGGER_MS: f64 = 120.0;
/// Each butterfly is removed this long after its launch
pub const LIFETIME_MS: f64 = 5200.0;
/// Destinations lie this far outside the viewport
pub const EDGE_OVERSHOOT: f32 = 150.0;
const FLIGHT_MS: f64 = 5000.0;
/// Bursts that may overlap before launches are dropped
const MAX_BURSTS: usize = 4;
const WING_SPAN: f32 = 14.0;
const FLAP_RATE: f32 = 0.025;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// A point `EDGE_OVERSHOOT` beyond this edge, placed at `along` (0..1)
    /// of the edge's length
    pub fn destination(self, viewport: Viewport, along: f32) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(along * viewport.width, -EDGE_OVERSHOOT),
            Edge::Right => Vec2::new(viewport.width + EDGE_OVERSHOOT, along * viewport.height),
            Edge::Bottom => Vec2::new(along * viewport.width, viewport.height + EDGE_OVERSHOOT),
            Edge::Left => Vec2::new(-EDGE_OVERSHOOT, along * viewport.height),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Butterfly {
    pub from: Vec2,
    pub to: Vec2,
    pub edge: Edge,
    /// Wait before this butterfly appears
    pub delay_ms: f64,
    /// Time since the burst was triggered
    pub age_ms: f64,
}

impl Butterfly {
    pub fn launch(rng: &mut ParticleRng, viewport: Viewport, index: usize) -> Self {
        let edge = Edge::ALL[rng.index(Edge::ALL.len())];
        let along = rng.next_f32();
        Self {
            from: viewport.center(),
            to: edge.destination(viewport, along),
            edge,
            delay_ms: index as f64 * STAGGER_MS,
            age_ms: 0.0,
        }
    }

    /// Milliseconds since launch, or `None` while still waiting
    pub fn flight_ms(&self) -> Option<f64> {
        let t = self.age_ms - self.delay_ms;
        (t >= 0.0).then_some(t)
    }

    pub fn position(&self) -> Vec2 {
        let t = self
            .flight_ms()
            .map_or(0.0, |ms| (ms / FLIGHT_MS).min(1.0) as f32);
        // Ease out: quick start, drifting off at the end
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.from + (self.to - self.from) * eased
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, color: Rgba) {
        let Some(ms) = self.flight_ms() else {
            return;
        };
        let at = self.position();
        let heading = (self.to - self.from).angle() + FRAC_PI_2;
        let flap = 0.35 + 0.65 * (ms as f32 * FLAP_RATE).sin().abs();

        surface.save();
        surface.translate(at.x, at.y);
        surface.rotate(heading);
        surface.scale(flap, 1.0);
        for side in [-1.0f32, 1.0] {
            let mut wing = Path::new();
            wing.move_to(Vec2::ZERO)
                .bezier_curve_to(
                    Vec2::new(side * WING_SPAN, -WING_SPAN * 1.2),
                    Vec2::new(side * WING_SPAN * 1.3, -WING_SPAN * 0.2),
                    Vec2::new(side * WING_SPAN * 0.3, WING_SPAN * 0.1),
                )
                .bezier_curve_to(
                    Vec2::new(side * WING_SPAN * 0.9, WING_SPAN * 0.5),
                    Vec2::new(side * WING_SPAN * 0.5, WING_SPAN * 0.9),
                    Vec2::ZERO,
                )
                .close();
            surface.fill_path(&wing, color, None);
        }
        surface.stroke_path(
            &Path::line(Vec2::new(0.0, -WING_SPAN * 0.4), Vec2::new(0.0, WING_SPAN * 0.5)),
            color.lerp(Rgba::BLACK, 0.5),
            2.0,
        );
        surface.restore();
    }
}

impl Transient for Butterfly {
    fn is_alive(&self) -> bool {
        self.age_ms < self.delay_ms + LIFETIME_MS
    }
}

pub struct ButterflyBurst {
    rng: ParticleRng,
    butterflies: TransientPool<Butterfly>,
}

impl ButterflyBurst {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: ParticleRng::new(seed),
            butterflies: TransientPool::new(BUTTERFLY_COUNT * MAX_BURSTS),
        }
    }

    pub fn butterflies(&self) -> &TransientPool<Butterfly> {
        &self.butterflies
    }

    pub fn is_active(&self) -> bool {
        !self.butterflies.is_empty()
    }

    /// Launch a new flight from the middle of `viewport`. Returns how many
    /// butterflies joined it.
    pub fn trigger(&mut self, viewport: Viewport) -> usize {
        let mut launched = 0;
        for i in 0..BUTTERFLY_COUNT {
            if !self
                .butterflies
                .push(Butterfly::launch(&mut self.rng, viewport, i))
            {
                log::debug!("[butterflies] pool full, {} launches dropped", BUTTERFLY_COUNT - i);
                break;
            }
            launched += 1;
        }
        log::debug!("[butterflies] burst of {launched}");
        launched
    }

    /// Age every butterfly and drop the ones past their lifetime
    pub fn update(&mut self, delta_ms: f64) -> usize {
        for butterfly in self.butterflies.iter_mut() {
            butterfly.age_ms += delta_ms.max(0.0);
        }
        self.butterflies.prune()
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface, color: Rgba) {
        for butterfly in self.butterflies.iter() {
            butterfly.draw(surface, color);
        }
    }
}
