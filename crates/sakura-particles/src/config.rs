//! Scene configuration parsed from the `[sky]`, `[moon]`, `[lanterns]`, and
//! `[music_box]` tables of a site file

use crate::field::AvoidanceField;

/// Hard cap on any configured particle count
pub const MAX_COUNT: usize = 10_000;

/// Falling-sky settings
#[derive(Debug, Clone, PartialEq)]
pub struct SkyConfig {
    pub flower_count: usize,
    pub petal_count: usize,
    pub firefly_count: usize,
    pub max_shooting_stars: usize,
    pub wind_strength: f32,
    pub wind_decay: f32,
    /// Probability of a new shooting star on any one tick
    pub shooting_star_chance: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            flower_count: 45,
            petal_count: 120,
            firefly_count: 40,
            max_shooting_stars: 64,
            wind_strength: 0.04,
            wind_decay: 0.95,
            shooting_star_chance: 0.002,
        }
    }
}

impl SkyConfig {
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("flower_count") {
            config.flower_count = toml_count(v, config.flower_count);
        }
        if let Some(v) = table.get("petal_count") {
            config.petal_count = toml_count(v, config.petal_count);
        }
        if let Some(v) = table.get("firefly_count") {
            config.firefly_count = toml_count(v, config.firefly_count);
        }
        if let Some(v) = table.get("max_shooting_stars") {
            config.max_shooting_stars = toml_count(v, config.max_shooting_stars);
        }
        if let Some(v) = table.get("wind_strength") {
            config.wind_strength = toml_f32(v, config.wind_strength);
        }
        if let Some(v) = table.get("wind_decay") {
            config.wind_decay = toml_f32(v, config.wind_decay);
        }
        if let Some(v) = table.get("shooting_star_chance") {
            config.shooting_star_chance = toml_f32(v, config.shooting_star_chance).clamp(0.0, 1.0);
        }

        config
    }
}

impl AvoidanceField {
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut field = Self::default();

        if let Some(v) = table.get("offset_x") {
            field.offset_x = toml_f32(v, field.offset_x);
        }
        if let Some(v) = table.get("y") {
            field.y = toml_f32(v, field.y);
        }
        if let Some(v) = table.get("radius") {
            field.radius = toml_f32(v, field.radius).max(0.0);
        }
        if let Some(v) = table.get("push") {
            field.push = toml_f32(v, field.push);
        }

        field
    }
}

/// Sky-lantern vignette settings
#[derive(Debug, Clone, PartialEq)]
pub struct LanternConfig {
    pub count: usize,
    /// Count used on narrow viewports
    pub compact_count: usize,
    /// Viewports narrower than this use the compact layout
    pub compact_width: f32,
}

impl Default for LanternConfig {
    fn default() -> Self {
        Self {
            count: 35,
            compact_count: 25,
            compact_width: 768.0,
        }
    }
}

impl LanternConfig {
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("count") {
            config.count = toml_count(v, config.count);
        }
        if let Some(v) = table.get("compact_count") {
            config.compact_count = toml_count(v, config.compact_count);
        }
        if let Some(v) = table.get("compact_width") {
            config.compact_width = toml_f32(v, config.compact_width);
        }

        config
    }
}

/// Music-box vignette settings
#[derive(Debug, Clone, PartialEq)]
pub struct MusicBoxConfig {
    /// Milliseconds between new notes
    pub note_interval_ms: f64,
    /// Life lost per tick; a note lives `1 / life_decay` ticks
    pub life_decay: f32,
    pub max_notes: usize,
}

impl Default for MusicBoxConfig {
    fn default() -> Self {
        Self {
            note_interval_ms: 800.0,
            life_decay: 0.003,
            max_notes: 512,
        }
    }
}

impl MusicBoxConfig {
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        if let Some(v) = table.get("note_interval_ms") {
            config.note_interval_ms = toml_f32(v, config.note_interval_ms as f32).max(1.0) as f64;
        }
        if let Some(v) = table.get("life_decay") {
            config.life_decay = toml_f32(v, config.life_decay).max(1e-4);
        }
        if let Some(v) = table.get("max_notes") {
            config.max_notes = toml_count(v, config.max_notes);
        }

        config
    }
}

/// Every scene's settings, read from one site file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneConfig {
    pub sky: SkyConfig,
    pub moon: AvoidanceField,
    pub lanterns: LanternConfig,
    pub music_box: MusicBoxConfig,
}

impl SceneConfig {
    /// Parse from the root table of a site file. Missing tables keep defaults.
    pub fn from_toml(root: &toml::value::Table) -> Self {
        let table = |name: &str| root.get(name).and_then(|v| v.as_table());
        let mut config = Self::default();
        if let Some(t) = table("sky") {
            config.sky = SkyConfig::from_toml(t);
        }
        if let Some(t) = table("moon") {
            config.moon = AvoidanceField::from_toml(t);
        }
        if let Some(t) = table("lanterns") {
            config.lanterns = LanternConfig::from_toml(t);
        }
        if let Some(t) = table("music_box") {
            config.music_box = MusicBoxConfig::from_toml(t);
        }
        config
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_count(v: &toml::Value, default: usize) -> usize {
    match v.as_integer() {
        Some(n) if n >= 0 => (n as usize).min(MAX_COUNT),
        Some(_) => 0,
        None => {
            log::warn!("expected an integer count, got {v}; keeping {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_site() {
        let sky = SkyConfig::default();
        assert_eq!(
            (sky.flower_count, sky.petal_count, sky.firefly_count),
            (45, 120, 40)
        );
        assert_eq!(sky.shooting_star_chance, 0.002);
        let moon = AvoidanceField::default();
        assert_eq!((moon.offset_x, moon.y, moon.radius), (140.0, 90.0, 140.0));
    }

    #[test]
    fn parse_full_site() {
        let toml_str = r#"
[sky]
flower_count = 10
petal_count = 20000
wind_decay = 0.9
shooting_star_chance = 1

[moon]
radius = 200

[lanterns]
count = 12
compact_width = 600

[music_box]
note_interval_ms = 400
"#;
        let root: toml::value::Table = toml::from_str(toml_str).unwrap();
        let config = SceneConfig::from_toml(&root);
        assert_eq!(config.sky.flower_count, 10);
        assert_eq!(config.sky.petal_count, MAX_COUNT);
        assert_eq!(config.sky.firefly_count, 40);
        assert!((config.sky.wind_decay - 0.9).abs() < 1e-6);
        assert_eq!(config.sky.shooting_star_chance, 1.0);
        assert_eq!(config.moon.radius, 200.0);
        assert_eq!(config.moon.push, 1.5);
        assert_eq!(config.lanterns.count, 12);
        assert_eq!(config.lanterns.compact_width, 600.0);
        assert_eq!(config.music_box.note_interval_ms, 400.0);
    }

    #[test]
    fn bad_values_fall_back() {
        let root: toml::value::Table = toml::from_str(
            r#"
[sky]
flower_count = "many"
firefly_count = -3
wind_strength = "strong"
"#,
        )
        .unwrap();
        let sky = SceneConfig::from_toml(&root).sky;
        assert_eq!(sky.flower_count, 45);
        assert_eq!(sky.firefly_count, 0);
        assert_eq!(sky.wind_strength, 0.04);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let root = toml::value::Table::new();
        assert_eq!(SceneConfig::from_toml(&root), SceneConfig::default());
    }
}
