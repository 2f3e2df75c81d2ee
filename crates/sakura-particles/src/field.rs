//! Wind and avoidance fields, and the per-tick frame context built from them

use sakura_core::{Vec2, Viewport};

/// A single horizontal wind scalar.
///
/// Pointer movement adds to it, every tick multiplies it toward zero. It is
/// never clamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindField {
    value: f32,
    pub strength: f32,
    pub decay: f32,
}

impl Default for WindField {
    fn default() -> Self {
        Self::new(0.04, 0.95)
    }
}

impl WindField {
    pub fn new(strength: f32, decay: f32) -> Self {
        Self {
            value: 0.0,
            strength,
            decay,
        }
    }

    /// Pointer at horizontal position `x`: right of center pushes right,
    /// left of center pushes left.
    pub fn impulse(&mut self, x: f32, viewport: Viewport) {
        self.value += (x - viewport.width * 0.5) * self.strength * 0.001;
    }

    /// Add a raw amount of wind
    pub fn add(&mut self, amount: f32) {
        self.value += amount;
    }

    pub fn decay(&mut self) {
        self.value *= self.decay;
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// The moon: a circle pinned to the top-right of the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvoidanceField {
    /// Distance of the center from the right edge
    pub offset_x: f32,
    pub y: f32,
    pub radius: f32,
    /// Displacement applied per tick to anything inside
    pub push: f32,
}

impl Default for AvoidanceField {
    fn default() -> Self {
        Self {
            offset_x: 140.0,
            y: 90.0,
            radius: 140.0,
            push: 1.5,
        }
    }
}

impl AvoidanceField {
    /// Circle for the current viewport. Recomputed on every call.
    pub fn circle(&self, viewport: Viewport) -> AvoidanceCircle {
        AvoidanceCircle {
            center: Vec2::new(viewport.width - self.offset_x, self.y),
            radius: self.radius,
            push: self.push,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvoidanceCircle {
    pub center: Vec2,
    pub radius: f32,
    pub push: f32,
}

impl AvoidanceCircle {
    /// Push `position` outward along the center-to-position angle if it lies
    /// strictly inside the circle.
    pub fn repel(&self, position: Vec2) -> Vec2 {
        let offset = position - self.center;
        if offset.length() < self.radius {
            position + Vec2::from_angle(offset.angle()) * self.push
        } else {
            position
        }
    }
}

/// Immutable inputs shared by every particle update in one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub wind: f32,
    pub avoidance: AvoidanceCircle,
    pub viewport: Viewport,
    /// Seconds since the scene started
    pub time: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_sign_follows_pointer_side() {
        let vp = Viewport::new(1000.0, 800.0);
        let mut wind = WindField::default();
        wind.impulse(1000.0, vp);
        assert!((wind.value() - 500.0 * 0.04 * 0.001).abs() < 1e-7);

        let mut wind = WindField::default();
        wind.impulse(0.0, vp);
        assert!(wind.value() < 0.0);

        let mut wind = WindField::default();
        wind.impulse(500.0, vp);
        assert_eq!(wind.value(), 0.0);
    }

    #[test]
    fn decay_is_geometric_and_keeps_sign() {
        let mut wind = WindField::default();
        wind.add(-0.3);
        for n in 1..=200 {
            wind.decay();
            let expected = -0.3 * 0.95f32.powi(n);
            assert!((wind.value() - expected).abs() <= expected.abs() * 1e-4 + 1e-12);
            assert!(wind.value() <= 0.0);
        }
    }

    #[test]
    fn wind_is_unbounded() {
        let mut wind = WindField::default();
        for _ in 0..10_000 {
            wind.impulse(2000.0, Viewport::new(1000.0, 800.0));
        }
        assert!(wind.value() > 100.0);
    }

    #[test]
    fn moon_tracks_viewport_width() {
        let moon = AvoidanceField::default();
        let c = moon.circle(Viewport::new(1280.0, 720.0));
        assert_eq!(c.center, Vec2::new(1140.0, 90.0));
        let c = moon.circle(Viewport::new(400.0, 720.0));
        assert_eq!(c.center, Vec2::new(260.0, 90.0));
        assert_eq!(c.radius, 140.0);
    }

    #[test]
    fn repel_only_inside() {
        let c = AvoidanceField::default().circle(Viewport::new(1280.0, 720.0));
        let inside = Vec2::new(1140.0, 150.0);
        let pushed = c.repel(inside);
        assert!((pushed.y - 151.5).abs() < 1e-4);
        assert!((pushed.x - 1140.0).abs() < 1e-4);

        let on_edge = Vec2::new(1140.0, 230.0);
        assert_eq!(c.repel(on_edge), on_edge);
    }
}
