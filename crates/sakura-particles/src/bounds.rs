//! Boundary policies: reflect a value inside [0, 1], wrap a coordinate
//! around an edge.

/// Advance `value` by `speed`, reflecting off 0 and 1.
///
/// Returns the new value and the (possibly reversed) speed. The value always
/// ends up in [0, 1].
pub fn ping_pong(value: f32, speed: f32) -> (f32, f32) {
    let mut v = value + speed;
    let mut s = speed;
    if v > 1.0 {
        v = 2.0 - v;
        s = -s;
    } else if v < 0.0 {
        v = -v;
        s = -s;
    }
    (v.clamp(0.0, 1.0), s)
}

/// Wrap `value` into [0, max). A non-positive extent collapses to 0.
pub fn wrap(value: f32, max: f32) -> f32 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let r = value.rem_euclid(max);
    // rem_euclid can round up to `max` for tiny negative inputs
    if r >= max {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong_reflects_at_top() {
        let (v, s) = ping_pong(0.99, 0.02);
        assert!((v - 0.99).abs() < 1e-6);
        assert!(s < 0.0);
    }

    #[test]
    fn ping_pong_reflects_at_bottom() {
        let (v, s) = ping_pong(0.01, -0.025);
        assert!((v - 0.015).abs() < 1e-6);
        assert!(s > 0.0);
    }

    #[test]
    fn ping_pong_passes_through_interior() {
        let (v, s) = ping_pong(0.5, 0.01);
        assert!((v - 0.51).abs() < 1e-6);
        assert_eq!(s, 0.01);
    }

    #[test]
    fn ping_pong_stays_in_unit_range() {
        let (mut v, mut s) = (0.3, 0.023);
        for _ in 0..100_000 {
            (v, s) = ping_pong(v, s);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn wrap_all_edges() {
        assert!((wrap(-0.5, 100.0) - 99.5).abs() < 1e-4);
        assert!((wrap(100.0, 100.0)).abs() < 1e-6);
        assert!((wrap(100.25, 100.0) - 0.25).abs() < 1e-4);
        assert_eq!(wrap(42.0, 100.0), 42.0);
    }

    #[test]
    fn wrap_tiny_negative_stays_below_max() {
        let w = wrap(-1e-9, 1280.0);
        assert!((0.0..1280.0).contains(&w));
    }

    #[test]
    fn wrap_degenerate_extent() {
        assert_eq!(wrap(5.0, 0.0), 0.0);
        assert_eq!(wrap(5.0, -3.0), 0.0);
        assert_eq!(wrap(f32::NAN, 10.0), 0.0);
    }
}
