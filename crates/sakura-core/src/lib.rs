//! Sakura Core - Foundational types for the Sakura scene engine
//!
//! This crate provides the types that all other Sakura crates depend on:
//! - `Vec2`, `Vec3`, `Rgba`, `Viewport`, `Rect` - Spatial and colour types
//! - `Affine` - 2D transform used by drawing surfaces
//! - `DrawingSurface`, `Path` - The 2D drawing contract particles render against
//! - `RecordingSurface` - A surface that records draw calls instead of rasterizing
//! - Error types and Result alias

mod error;
mod recording;
mod surface;
mod transform;
mod types;

pub use error::{Result, SakuraError};
pub use recording::{DrawOp, RecordingSurface};
pub use surface::{DrawingSurface, Glow, Path, PathCommand, Polyline};
pub use transform::Affine;
pub use types::{Rect, Rgba, Vec2, Vec3, Viewport};
