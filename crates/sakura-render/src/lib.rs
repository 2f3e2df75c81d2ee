//! Sakura Render - software canvas and wgpu presentation
//!
//! Scenes draw into a CPU `Canvas` (an RGBA8 raster implementing
//! `DrawingSurface`). The windowed player uploads that canvas each frame and
//! composites it over the theme background with a single fullscreen pass;
//! the CLI writes it straight to PNG.

mod canvas;
mod context;
pub mod present;

pub use canvas::Canvas;
pub use context::{RenderContext, RenderError};
pub use present::{PresentPipeline, PresentUniforms};
