//! Sakura Runtime - Frame loop infrastructure
//!
//! Provides the building blocks shared by every scene:
//! - `FrameClock` - frame timing with an optional fixed-timestep accumulator
//! - `InputState` / `CursorGlow` - pointer, touch, and key action tracking
//! - `RuntimeSystem` / `FrameInput` - trait for scenes ticked by the frame loop
//! - `PreferenceStore` / `Preferences` - the persisted theme and mute choices
//! - `ThemeRegistry` / `StyleTokens` - named colour tokens per theme
//! - `Countdown` - time remaining until the event

mod clock;
mod countdown;
mod input;
mod persist;
mod system;
mod theme;

pub use clock::FrameClock;
pub use countdown::{Countdown, Remaining, DEFAULT_TARGET};
pub use input::{CursorGlow, InputState, PointerSample, CURSOR_SMOOTHING};
pub use persist::{PreferenceStore, Preferences, MUTED_KEY, THEME_KEY};
pub use system::{FrameInput, RuntimeSystem};
pub use theme::{StyleTokens, ThemeRegistry, DEFAULT_THEME};
