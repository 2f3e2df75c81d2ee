//! Runtime system trait

use crate::theme::StyleTokens;
use sakura_core::{DrawingSurface, Result, Viewport};

/// Read-only inputs for one frame
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    /// Logical drawing area, re-read every frame
    pub viewport: Viewport,
    /// Seconds since the scene started
    pub time: f64,
    /// Milliseconds of wall time since the previous frame
    pub delta_ms: f64,
    /// Colour tokens of the active theme
    pub style: &'a StyleTokens,
}

/// A scene that can be ticked by the frame loop
///
/// Each call to `tick` advances the simulation by exactly one step and draws
/// the result; the system decides how update and draw interleave.
pub trait RuntimeSystem {
    /// Called once before the first tick
    fn initialize(&mut self, viewport: Viewport) -> Result<()>;

    /// Horizontal pointer or touch movement in logical pixels
    fn pointer_moved(&mut self, _x: f32, _viewport: Viewport) {}

    /// Advance one step and draw onto `surface`
    fn tick(&mut self, surface: &mut dyn DrawingSurface, frame: &FrameInput<'_>);

    /// Blur radius for the page-title halo this frame
    fn title_glow(&self) -> f32 {
        0.0
    }

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
