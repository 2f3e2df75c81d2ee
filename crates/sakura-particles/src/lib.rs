//! Sakura Particles - the animated scenes behind the invitation
//!
//! Everything here is plain CPU simulation drawing through
//! `sakura_core::DrawingSurface`:
//! - `SkySystem` - flowers, petals, fireflies, and shooting stars under the moon
//! - `LanternSystem` - sky lanterns rising through a perspective camera
//! - `MusicBoxSystem` - notes drifting out of a music box
//! - `ButterflyBurst` - a one-shot flight of butterflies over any scene
//!
//! The three scenes implement `RuntimeSystem` so the player and the headless
//! CLI can drive any of them through the same frame loop; the butterfly burst
//! is layered on top by the player.

pub mod bounds;
pub mod butterfly;
pub mod cabinet;
pub mod camera;
pub mod config;
pub mod curves;
pub mod field;
pub mod firefly;
pub mod flower;
pub mod lantern;
pub mod notes;
pub mod palette;
pub mod petal;
pub mod pool;
pub mod rand;
pub mod scene;
pub mod shapes;
pub mod shooting_star;
pub mod sky;

pub use butterfly::ButterflyBurst;
pub use config::{LanternConfig, MusicBoxConfig, SceneConfig, SkyConfig};
pub use field::{AvoidanceField, WindField};
pub use lantern::LanternSystem;
pub use notes::MusicBoxSystem;
pub use palette::Palette;
pub use scene::SceneKind;
pub use sky::{title_glow, SkyStats, SkySystem};
