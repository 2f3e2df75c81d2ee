//! A `DrawingSurface` that records what was drawn instead of rasterizing it
//!
//! Used by headless simulation runs and by tests that need to assert on the
//! exact sequence of draws a frame produced.

use crate::surface::{DrawingSurface, Glow, Path};
use crate::transform::Affine;
use crate::types::{Rect, Rgba, Vec2};

/// One recorded draw
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Rect),
    Fill {
        /// First point of the path mapped through the active transform
        origin: Vec2,
        color: Rgba,
        alpha: f32,
        glow: Option<Glow>,
    },
    Stroke {
        origin: Vec2,
        color: Rgba,
        alpha: f32,
        width: f32,
    },
}

#[derive(Clone, Copy, Debug)]
struct State {
    transform: Affine,
    alpha: f32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    state: State,
    stack: Vec<State>,
    max_depth: usize,
    unbalanced_restores: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop recorded ops but keep transform state
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .count()
    }

    pub fn stroke_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Stroke { .. }))
            .count()
    }

    pub fn clear_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Clear(_)))
            .count()
    }

    /// Current save depth, zero when every `save` has been restored
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn unbalanced_restores(&self) -> usize {
        self.unbalanced_restores
    }

    pub fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    fn origin_of(&self, path: &Path) -> Vec2 {
        let local = path.first_point().unwrap_or(Vec2::ZERO);
        self.state.transform.apply(local)
    }
}

impl DrawingSurface for RecordingSurface {
    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Clear(rect));
    }

    fn save(&mut self) {
        self.stack.push(self.state);
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => self.unbalanced_restores += 1,
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = self.state.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform.rotate(radians);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.scale(sx, sy);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_path(&mut self, path: &Path, color: Rgba, glow: Option<Glow>) {
        self.ops.push(DrawOp::Fill {
            origin: self.origin_of(path),
            color,
            alpha: self.state.alpha,
            glow,
        });
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        self.ops.push(DrawOp::Stroke {
            origin: self.origin_of(path),
            color,
            alpha: self.state.alpha,
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_covers_alpha_and_transform() {
        let mut s = RecordingSurface::new();
        s.save();
        s.translate(10.0, 20.0);
        s.set_global_alpha(0.25);
        s.fill_circle(Vec2::ZERO, 1.0, Rgba::WHITE, None);
        s.restore();
        s.fill_circle(Vec2::ZERO, 1.0, Rgba::WHITE, None);

        match (&s.ops()[0], &s.ops()[1]) {
            (
                DrawOp::Fill {
                    origin: a,
                    alpha: aa,
                    ..
                },
                DrawOp::Fill {
                    origin: b,
                    alpha: ba,
                    ..
                },
            ) => {
                assert!((a.x - 11.0).abs() < 1e-5 && (a.y - 20.0).abs() < 1e-5);
                assert!((b.x - 1.0).abs() < 1e-5 && b.y.abs() < 1e-5);
                assert_eq!(*aa, 0.25);
                assert_eq!(*ba, 1.0);
            }
            other => panic!("unexpected ops {other:?}"),
        }
        assert_eq!(s.depth(), 0);
        assert_eq!(s.max_depth(), 1);
    }

    #[test]
    fn restore_without_save_is_counted() {
        let mut s = RecordingSurface::new();
        s.restore();
        assert_eq!(s.unbalanced_restores(), 1);
    }

    #[test]
    fn counters() {
        let mut s = RecordingSurface::new();
        s.clear_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        s.fill_circle(Vec2::ZERO, 1.0, Rgba::WHITE, None);
        s.stroke_path(&Path::line(Vec2::ZERO, Vec2::new(1.0, 1.0)), Rgba::WHITE, 2.0);
        assert_eq!(s.clear_count(), 1);
        assert_eq!(s.fill_count(), 1);
        assert_eq!(s.stroke_count(), 1);
        assert_eq!(s.take_ops().len(), 3);
        assert!(s.ops().is_empty());
    }
}
