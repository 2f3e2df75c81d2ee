//! Things drawn on top of the active scene

use sakura_core::{DrawingSurface, Glow};
use sakura_particles::{ButterflyBurst, Palette};
use sakura_runtime::{CursorGlow, Remaining};

const HALO_RADIUS: f32 = 10.0;
const HALO_BLUR: f32 = 20.0;

/// Soft halo trailing the pointer; it flares with the title glow
pub fn draw_cursor_halo(
    surface: &mut dyn DrawingSurface,
    cursor: &CursorGlow,
    title_glow: f32,
    palette: &Palette,
) {
    surface.fill_circle(
        cursor.position,
        HALO_RADIUS,
        palette.glow.with_alpha(0.35),
        Some(Glow::new(HALO_BLUR + title_glow, palette.glow.with_alpha(0.6))),
    );
}

/// Butterflies take the petal colour of the current theme
pub fn draw_butterflies(
    surface: &mut dyn DrawingSurface,
    burst: &ButterflyBurst,
    palette: &Palette,
) {
    burst.draw(surface, palette.petal);
}

pub fn window_title(remaining: &Remaining, muted: bool) -> String {
    let mut title = if remaining.is_zero() {
        "Sakura".to_string()
    } else {
        format!("Sakura · {remaining}")
    };
    if muted {
        title.push_str(" (muted)");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_core::{DrawOp, RecordingSurface, Vec2, Viewport};

    #[test]
    fn halo_follows_cursor_and_title_glow() {
        let mut cursor = CursorGlow::new(Viewport::new(200.0, 100.0));
        cursor.position = Vec2::new(30.0, 40.0);
        let mut surface = RecordingSurface::new();
        draw_cursor_halo(&mut surface, &cursor, 12.0, &Palette::default());

        assert_eq!(surface.fill_count(), 1);
        match surface.ops()[0] {
            DrawOp::Fill { origin, glow, .. } => {
                assert!((origin.x - 40.0).abs() < 1e-4);
                assert!((origin.y - 40.0).abs() < 1e-4);
                assert_eq!(glow.map(|g| g.blur), Some(32.0));
            }
            ref other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn butterflies_use_petal_colour() {
        let mut burst = ButterflyBurst::new(3);
        let mut surface = RecordingSurface::new();
        draw_butterflies(&mut surface, &burst, &Palette::default());
        assert!(surface.ops().is_empty());

        burst.trigger(Viewport::new(800.0, 600.0));
        burst.update(1.0);
        draw_butterflies(&mut surface, &burst, &Palette::default());
        assert_eq!(surface.fill_count(), 2);
        assert!(surface.ops().iter().all(|op| match op {
            DrawOp::Fill { color, .. } => *color == Palette::default().petal,
            _ => true,
        }));
    }

    #[test]
    fn title_shows_countdown_and_mute() {
        let remaining = Remaining {
            days: 3,
            hours: 4,
            minutes: 5,
            seconds: 6,
        };
        assert_eq!(window_title(&remaining, false), "Sakura · 03:04:05:06");
        assert_eq!(window_title(&remaining, true), "Sakura · 03:04:05:06 (muted)");
        assert_eq!(window_title(&Remaining::default(), false), "Sakura");
    }
}
