//! The 2D drawing contract every scene renders against
//!
//! `DrawingSurface` mirrors the small subset of an immediate-mode canvas that
//! particles need: transform stack, global alpha, filled/stroked paths, and an
//! optional soft glow. Implementations live elsewhere (a software raster in
//! `sakura-render`, a call recorder in this crate).

use crate::types::{Rect, Rgba, Vec2};
use std::f32::consts::TAU;

/// Soft halo drawn behind a fill (shadow blur + shadow colour)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub blur: f32,
    pub color: Rgba,
}

impl Glow {
    pub const fn new(blur: f32, color: Rgba) -> Self {
        Self { blur, color }
    }
}

/// One path construction step
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    BezierTo { c1: Vec2, c2: Vec2, to: Vec2 },
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
    },
    Close,
}

/// A flattened subpath in the path's local coordinates
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

/// A vector path built from move/line/curve/arc commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full circle, the shape behind every firefly and glow dot
    pub fn circle(center: Vec2, radius: f32) -> Self {
        let mut path = Self::new();
        path.arc(center, radius, 0.0, TAU);
        path.close();
        path
    }

    /// Straight segment between two points
    pub fn line(from: Vec2, to: Vec2) -> Self {
        let mut path = Self::new();
        path.move_to(from);
        path.line_to(to);
        path
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn bezier_curve_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::BezierTo { c1, c2, to });
        self
    }

    /// Clockwise arc from `start` to `end` (radians). Sweeps of a full turn or
    /// more draw a full circle.
    pub fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) -> &mut Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start,
            end,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// First point the path visits, if any
    pub fn first_point(&self) -> Option<Vec2> {
        self.commands.iter().find_map(|cmd| match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::BezierTo { to, .. } => Some(to),
            PathCommand::Arc {
                center,
                radius,
                start,
                ..
            } => Some(center + Vec2::from_angle(start) * radius),
            PathCommand::Close => None,
        })
    }

    /// Flatten curves and arcs into polylines.
    ///
    /// `scale` is the device pixels per local unit; it only picks how many
    /// segments each curve gets.
    pub fn flatten(&self, scale: f32) -> Vec<Polyline> {
        let scale = scale.max(1e-3);
        let mut out = Vec::new();
        let mut current = Polyline::default();
        let mut subpath_start: Option<Vec2> = None;

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    flush(&mut out, &mut current);
                    current.points.push(p);
                    subpath_start = Some(p);
                }
                PathCommand::LineTo(p) => {
                    if current.points.is_empty() {
                        subpath_start = Some(p);
                    }
                    current.points.push(p);
                }
                PathCommand::BezierTo { c1, c2, to } => {
                    let from = match current.points.last() {
                        Some(&p) => p,
                        None => {
                            current.points.push(c1);
                            subpath_start = Some(c1);
                            c1
                        }
                    };
                    let hull = from.distance(c1) + c1.distance(c2) + c2.distance(to);
                    let segments = ((hull * scale / 3.0).ceil() as usize).clamp(4, 64);
                    for i in 1..=segments {
                        let t = i as f32 / segments as f32;
                        current.points.push(cubic_point(from, c1, c2, to, t));
                    }
                }
                PathCommand::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => {
                    let sweep = (end - start).clamp(-TAU, TAU);
                    let segments =
                        ((sweep.abs() * radius.abs() * scale / 2.0).ceil() as usize).clamp(8, 256);
                    let first = center + Vec2::from_angle(start) * radius;
                    if current.points.is_empty() {
                        subpath_start = Some(first);
                    }
                    current.points.push(first);
                    for i in 1..=segments {
                        let angle = start + sweep * (i as f32 / segments as f32);
                        current.points.push(center + Vec2::from_angle(angle) * radius);
                    }
                }
                PathCommand::Close => {
                    current.closed = true;
                    flush(&mut out, &mut current);
                    // A new subpath starts where the closed one began
                    if let Some(start) = subpath_start {
                        current.points.push(start);
                    }
                }
            }
        }
        flush(&mut out, &mut current);
        out
    }
}

fn flush(out: &mut Vec<Polyline>, current: &mut Polyline) {
    let taken = std::mem::take(current);
    if taken.points.len() >= 2 {
        out.push(taken);
    }
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// An addressable 2D raster the scenes draw onto.
///
/// Transform calls compose in local space, `save`/`restore` push and pop the
/// transform together with the global alpha.
pub trait DrawingSurface {
    /// Reset a region to fully transparent (ignores the current transform)
    fn clear_rect(&mut self, rect: Rect);

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    fn rotate(&mut self, radians: f32);

    fn scale(&mut self, sx: f32, sy: f32);

    /// Multiplier applied to every subsequent fill and stroke
    fn set_global_alpha(&mut self, alpha: f32);

    fn fill_path(&mut self, path: &Path, color: Rgba, glow: Option<Glow>);

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba, glow: Option<Glow>) {
        self.fill_path(&Path::circle(center, radius), color, glow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_flattens_to_closed_ring() {
        let path = Path::circle(Vec2::new(10.0, 10.0), 5.0);
        let lines = path.flatten(1.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        for p in &lines[0].points {
            assert!((p.distance(Vec2::new(10.0, 10.0)) - 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn bezier_ends_at_target() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO)
            .bezier_curve_to(Vec2::new(-6.0, -8.0), Vec2::new(-10.0, -2.0), Vec2::new(0.0, 12.0));
        let lines = path.flatten(1.0);
        let last = *lines[0].points.last().unwrap();
        assert!(last.distance(Vec2::new(0.0, 12.0)) < 1e-4);
    }

    #[test]
    fn move_to_starts_new_subpath() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO).line_to(Vec2::new(1.0, 0.0));
        path.move_to(Vec2::new(5.0, 5.0)).line_to(Vec2::new(6.0, 5.0));
        assert_eq!(path.flatten(1.0).len(), 2);
    }

    #[test]
    fn first_point_of_arc() {
        let path = Path::circle(Vec2::new(2.0, 3.0), 1.0);
        let p = path.first_point().unwrap();
        assert!(p.distance(Vec2::new(3.0, 3.0)) < 1e-6);
    }

    #[test]
    fn lone_move_is_dropped() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO);
        assert!(path.flatten(1.0).is_empty());
    }
}
