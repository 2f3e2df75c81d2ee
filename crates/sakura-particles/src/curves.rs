//! Small interpolation helpers shared by the vignettes

use sakura_core::Rgba;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two colours
pub fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    a.lerp(b, t)
}
