//! Site file loading
//!
//! One TOML file configures every scene, the countdown target, the theme
//! palettes, and the background track. Every table and key is optional.

use sakura_core::{Result, SakuraError};
use sakura_particles::SceneConfig;
use sakura_runtime::{Countdown, ThemeRegistry};
use std::path::{Path, PathBuf};

/// Site file looked up in the working directory when none is given
pub const DEFAULT_SITE_FILE: &str = "sakura.toml";

#[derive(Clone, Debug, Default)]
pub struct SiteConfig {
    pub scenes: SceneConfig,
    pub countdown: Countdown,
    pub themes: ThemeRegistry,
    /// Background track, resolved against the site file's directory
    pub music: Option<PathBuf>,
}

impl SiteConfig {
    /// Parse a site file's contents. Relative paths resolve against `base_dir`.
    pub fn from_toml_str(source: &str, base_dir: &Path) -> Result<Self> {
        let root: toml::value::Table = toml::from_str(source)?;

        let countdown = match table(&root, "countdown")?.and_then(|t| t.get("target")) {
            Some(value) => {
                let target = value.as_str().ok_or_else(|| {
                    SakuraError::ConfigError("countdown.target must be a string".into())
                })?;
                Countdown::parse(target)?
            }
            None => Countdown::default(),
        };

        let themes = match table(&root, "themes")? {
            Some(t) => ThemeRegistry::from_toml(t)?,
            None => ThemeRegistry::new(),
        };

        let music = match table(&root, "music")?.and_then(|t| t.get("path")) {
            Some(value) => {
                let path = value.as_str().ok_or_else(|| {
                    SakuraError::ConfigError("music.path must be a string".into())
                })?;
                Some(base_dir.join(path))
            }
            None => None,
        };

        Ok(Self {
            scenes: SceneConfig::from_toml(&root),
            countdown,
            themes,
            music,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let site = Self::from_toml_str(&source, base_dir)?;
        log::info!(
            "[site] loaded {} ({} themes)",
            path.display(),
            site.themes.names().len()
        );
        Ok(site)
    }

    /// Like `load`, but a missing file yields the built-in defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("[site] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

fn table<'a>(root: &'a toml::value::Table, name: &str) -> Result<Option<&'a toml::value::Table>> {
    match root.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_table()
            .map(Some)
            .ok_or_else(|| SakuraError::ConfigError(format!("[{name}] must be a table"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sakura_runtime::DEFAULT_THEME;

    #[test]
    fn empty_file_is_all_defaults() {
        let site = SiteConfig::from_toml_str("", Path::new(".")).unwrap();
        assert_eq!(site.scenes, SceneConfig::default());
        assert_eq!(site.countdown, Countdown::default());
        assert_eq!(site.themes.names(), vec![DEFAULT_THEME]);
        assert!(site.music.is_none());
    }

    #[test]
    fn reads_every_table() {
        let source = r##"
[sky]
flower_count = 10

[lanterns]
count = 12

[countdown]
target = "2030-01-01T00:00:00Z"

[themes.dawn]
petal-color = "250,200,150"
background = "#202040"

[music]
path = "audio/theme.ogg"
"##;
        let site = SiteConfig::from_toml_str(source, Path::new("/srv/site")).unwrap();
        assert_eq!(site.scenes.sky.flower_count, 10);
        assert_eq!(site.scenes.lanterns.count, 12);
        assert_eq!(site.countdown.target().to_rfc3339(), "2030-01-01T00:00:00+00:00");
        assert_eq!(site.themes.names(), vec!["dawn", "moon"]);
        assert_eq!(site.themes.resolve("dawn").get("background"), Some("#202040"));
        assert_eq!(site.music, Some(PathBuf::from("/srv/site/audio/theme.ogg")));
    }

    #[test]
    fn bad_countdown_is_an_error() {
        let err = SiteConfig::from_toml_str("[countdown]\ntarget = \"soon\"", Path::new("."))
            .unwrap_err();
        assert!(matches!(err, SakuraError::CountdownError(_)));
    }

    #[test]
    fn scalar_where_table_expected_is_an_error() {
        let err = SiteConfig::from_toml_str("themes = 3", Path::new(".")).unwrap_err();
        assert!(matches!(err, SakuraError::ConfigError(_)));
    }

    #[test]
    fn missing_file_falls_back() {
        let path = std::env::temp_dir().join("sakura_site_missing_test.toml");
        let _ = std::fs::remove_file(&path);
        let site = SiteConfig::load_or_default(&path).unwrap();
        assert!(site.music.is_none());
    }

    #[test]
    fn load_resolves_music_next_to_file() {
        let dir = std::env::temp_dir().join("sakura_site_load_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sakura.toml");
        std::fs::write(&path, "[music]\npath = \"song.ogg\"\n").unwrap();
        let site = SiteConfig::load(&path).unwrap();
        assert_eq!(site.music, Some(dir.join("song.ogg")));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
