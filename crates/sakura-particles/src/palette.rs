//! Colours resolved from the active theme, with built-in fallbacks

use sakura_core::Rgba;
use sakura_runtime::StyleTokens;

pub const PETAL_COLOR_DEFAULT: &str = "255,183,197";
pub const GLOW_COLOR_DEFAULT: &str = "255,200,220";
pub const ACCENT_COLOR_DEFAULT: &str = "#ffd6e3";
pub const BACKGROUND_DEFAULT: &str = "#0b1026";

/// Fixed colours that do not follow the theme
pub mod fixed {
    use sakura_core::Rgba;

    pub const FLOWER_CENTER: Rgba = Rgba::new(1.0, 200.0 / 255.0, 120.0 / 255.0, 1.0);
    pub const FIREFLY: Rgba = Rgba::new(1.0, 1.0, 180.0 / 255.0, 1.0);
    pub const FIREFLY_GLOW: Rgba = Rgba::new(1.0, 1.0, 200.0 / 255.0, 0.8);
    pub const STAR_TRAIL: Rgba = Rgba::new(1.0, 1.0, 1.0, 0.8);
}

/// Theme colours for one frame. Missing or blank tokens use the defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub petal: Rgba,
    pub glow: Rgba,
    pub accent: Rgba,
    pub background: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self::resolve(&StyleTokens::new())
    }
}

impl Palette {
    pub fn resolve(style: &StyleTokens) -> Self {
        Self {
            petal: style.color_or("petal-color", PETAL_COLOR_DEFAULT),
            glow: style.color_or("glow-color", GLOW_COLOR_DEFAULT),
            accent: style.color_or("accent-color", ACCENT_COLOR_DEFAULT),
            background: style.color_or("background", BACKGROUND_DEFAULT),
        }
    }
}
