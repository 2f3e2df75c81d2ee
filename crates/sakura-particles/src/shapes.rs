//! Vector shapes shared by flowers and petals

use crate::palette::fixed;
use sakura_core::{DrawingSurface, Path, Rgba, Vec2};
use std::f32::consts::TAU;

const FLOWER_PETALS: usize = 5;
const FLOWER_RADIUS: f32 = 15.0;
const FLOWER_CENTER_RADIUS: f32 = 3.0;

/// Teardrop petal with its tip at the origin, about 20 units wide and 20 tall
pub fn petal_path() -> Path {
    let mut path = Path::new();
    path.move_to(Vec2::ZERO)
        .bezier_curve_to(Vec2::new(-6.0, -8.0), Vec2::new(-10.0, -2.0), Vec2::new(0.0, 12.0))
        .bezier_curve_to(Vec2::new(10.0, -2.0), Vec2::new(6.0, -8.0), Vec2::ZERO)
        .close();
    path
}

/// Fill one petal in the current local space
pub fn draw_petal(surface: &mut dyn DrawingSurface, color: Rgba, opacity: f32) {
    surface.fill_path(&petal_path(), color.with_alpha(opacity), None);
}

/// Five petals around a warm center, in the current local space
pub fn draw_flower(surface: &mut dyn DrawingSurface, petal_color: Rgba, opacity: f32) {
    let petal = petal_path();
    let fill = petal_color.with_alpha(opacity);
    for i in 0..FLOWER_PETALS {
        surface.save();
        surface.rotate(TAU / FLOWER_PETALS as f32 * i as f32);
        surface.translate(0.0, -FLOWER_RADIUS);
        surface.fill_path(&petal, fill, None);
        surface.restore();
    }
    surface.fill_circle(
        Vec2::ZERO,
        FLOWER_CENTER_RADIUS,
        fixed::FLOWER_CENTER.with_alpha(opacity),
        None,
    );
}
