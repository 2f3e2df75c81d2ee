//! 2D affine transform with canvas-style composition

use crate::types::Vec2;

/// Row-major 2x3 affine matrix:
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
///
/// `translate`/`rotate`/`scale` post-multiply, so each call operates in the
/// current local space (the same convention as an HTML canvas context).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// `self * local`
    pub fn then(&self, local: &Affine) -> Self {
        Self {
            a: self.a * local.a + self.c * local.b,
            b: self.b * local.a + self.d * local.b,
            c: self.a * local.c + self.c * local.d,
            d: self.b * local.c + self.d * local.d,
            e: self.a * local.e + self.c * local.f + self.e,
            f: self.b * local.e + self.d * local.f + self.f,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        self.then(&Affine {
            e: dx,
            f: dy,
            ..Self::IDENTITY
        })
    }

    pub fn rotate(&self, radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        self.then(&Affine {
            a: c,
            b: s,
            c: -s,
            d: c,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn scale(&self, sx: f32, sy: f32) -> Self {
        self.then(&Self::scaling(sx, sy))
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Geometric mean of the axis scales, used to size strokes and glows
    pub fn average_scale(&self) -> f32 {
        let det = (self.a * self.d - self.b * self.c).abs();
        det.sqrt()
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}
