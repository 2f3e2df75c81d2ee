//! Perspective look-at camera for the 3D vignettes

use sakura_core::{Vec2, Vec3, Viewport};

/// A world point mapped onto the surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub point: Vec2,
    /// Distance along the view direction
    pub depth: f32,
    /// Surface pixels per world unit at this depth
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn look_at(position: Vec3, target: Vec3, fov_y: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::UP,
            fov_y,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Right, up, forward
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalized();
        let right = forward.cross(&self.up).normalized();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Project onto a surface of the given size; `None` outside the clip range
    pub fn project(&self, world: Vec3, viewport: Viewport) -> Option<Projected> {
        let (right, up, forward) = self.basis();
        let rel = world - self.position;
        let depth = rel.dot(&forward);
        if depth < self.near || depth > self.far {
            return None;
        }

        let focal = 1.0 / (self.fov_y.to_radians() * 0.5).tan();
        let ndc_x = rel.dot(&right) * focal / (viewport.aspect_ratio() * depth);
        let ndc_y = rel.dot(&up) * focal / depth;

        Some(Projected {
            point: Vec2::new(
                (ndc_x + 1.0) * 0.5 * viewport.width,
                (1.0 - ndc_y) * 0.5 * viewport.height,
            ),
            depth,
            scale: focal / depth * viewport.height * 0.5,
        })
    }
}
