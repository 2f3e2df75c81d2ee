//! Preference store - string key-value pairs that survive restarts.
//!
//! The store keeps `toml::Value`s in a flat table and reads/writes a TOML file.
//! `Preferences` is the typed view of the two keys the scenes care about.

use crate::theme::{ThemeRegistry, DEFAULT_THEME};
use sakura_core::{Result, SakuraError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key holding the selected theme name
pub const THEME_KEY: &str = "wedding-theme";
/// Key holding `"true"` when music is muted
pub const MUTED_KEY: &str = "wedding-music-muted";

/// A flat key-value store, optionally backed by a TOML file
#[derive(Debug, Default)]
pub struct PreferenceStore {
    data: BTreeMap<String, toml::Value>,
    path: Option<PathBuf>,
}

impl PreferenceStore {
    /// In-memory store with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/sakura/preferences.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sakura").join("preferences.toml"))
    }

    /// Open a file-backed store. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = Self {
            data: BTreeMap::new(),
            path: Some(path.clone()),
        };
        if path.exists() {
            store.load_from_file(&path)?;
            log::info!("Loaded {} preference(s) from {}", store.data.len(), path.display());
        } else {
            log::debug!("No preference file at {}", path.display());
        }
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set a value by key. Overwrites any existing value.
    pub fn set(&mut self, key: &str, value: toml::Value) {
        self.data.insert(key.to_string(), value);
    }

    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.set(key, toml::Value::String(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.data.get(key)
    }

    /// String value for `key`; non-string values read as absent
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<toml::Value> {
        self.data.remove(key)
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        self.data.keys().map(|k| k.as_str()).collect()
    }

    /// Write to the backing file, creating parent directories. No-op for
    /// in-memory stores.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                self.save_to_file(path)
            }
            None => Ok(()),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let table: toml::map::Map<String, toml::Value> =
            self.data.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let content = toml::to_string_pretty(&table)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from a TOML file, replacing all current data
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let table: toml::map::Map<String, toml::Value> = toml::from_str(&content)
            .map_err(|e| SakuraError::PreferenceError(format!("{}: {e}", path.display())))?;
        self.data = table.into_iter().collect();
        Ok(())
    }
}

/// Typed view over the persisted theme and mute choices
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preferences {
    pub theme: String,
    pub muted: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            muted: false,
        }
    }
}

impl Preferences {
    /// Read from a store; absent or empty values take their defaults.
    /// Only the exact string `"true"` counts as muted.
    pub fn from_store(store: &PreferenceStore) -> Self {
        let theme = store
            .get_str(THEME_KEY)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_THEME)
            .to_string();
        let muted = store.get_str(MUTED_KEY) == Some("true");
        Self { theme, muted }
    }

    /// Copy both values into the store as strings
    pub fn write_to(&self, store: &mut PreferenceStore) {
        store.set_str(THEME_KEY, self.theme.clone());
        store.set_str(MUTED_KEY, self.muted.to_string());
    }

    /// Flip the mute flag and return the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Advance to the next registered theme and return its name
    pub fn cycle_theme(&mut self, registry: &ThemeRegistry) -> &str {
        self.theme = registry.next_after(&self.theme);
        &self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::StyleTokens;

    #[test]
    fn set_get_and_remove() {
        let mut store = PreferenceStore::new();
        store.set_str("theme", "moon");
        assert_eq!(store.get_str("theme"), Some("moon"));
        assert!(store.has("theme"));
        assert_eq!(
            store.remove("theme"),
            Some(toml::Value::String("moon".into()))
        );
        assert!(!store.has("theme"));
    }

    #[test]
    fn non_string_reads_as_absent() {
        let mut store = PreferenceStore::new();
        store.set(MUTED_KEY, toml::Value::Boolean(true));
        assert_eq!(store.get_str(MUTED_KEY), None);
        assert!(!Preferences::from_store(&store).muted);
    }

    #[test]
    fn defaults_when_empty() {
        let prefs = Preferences::from_store(&PreferenceStore::new());
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.theme, "moon");
    }

    #[test]
    fn empty_theme_uses_default() {
        let mut store = PreferenceStore::new();
        store.set_str(THEME_KEY, "");
        assert_eq!(Preferences::from_store(&store).theme, "moon");
    }

    #[test]
    fn only_exact_true_mutes() {
        let mut store = PreferenceStore::new();
        store.set_str(MUTED_KEY, "TRUE");
        assert!(!Preferences::from_store(&store).muted);
        store.set_str(MUTED_KEY, "true");
        assert!(Preferences::from_store(&store).muted);
    }

    #[test]
    fn write_to_stores_strings() {
        let mut store = PreferenceStore::new();
        let prefs = Preferences {
            theme: "sunset".into(),
            muted: true,
        };
        prefs.write_to(&mut store);
        assert_eq!(store.get_str(THEME_KEY), Some("sunset"));
        assert_eq!(store.get_str(MUTED_KEY), Some("true"));
        assert_eq!(store.keys(), vec![MUTED_KEY, THEME_KEY]);
    }

    #[test]
    fn toggle_and_cycle() {
        let mut registry = ThemeRegistry::new();
        registry.insert("sunset", StyleTokens::new());
        let mut prefs = Preferences::default();
        assert!(prefs.toggle_mute());
        assert!(!prefs.toggle_mute());
        assert_eq!(prefs.cycle_theme(&registry), "sunset");
        assert_eq!(prefs.cycle_theme(&registry), "moon");
    }

    #[test]
    fn save_and_reopen() {
        let dir = std::env::temp_dir().join("sakura_prefs_test");
        let path = dir.join("nested").join("preferences.toml");
        let _ = std::fs::remove_file(&path);

        let mut store = PreferenceStore::open(path.clone()).expect("open failed");
        assert!(store.keys().is_empty());
        Preferences {
            theme: "dawn".into(),
            muted: true,
        }
        .write_to(&mut store);
        store.save().expect("save failed");

        let reopened = PreferenceStore::open(path.clone()).expect("reopen failed");
        let prefs = Preferences::from_store(&reopened);
        assert_eq!(prefs.theme, "dawn");
        assert!(prefs.muted);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = std::env::temp_dir().join("sakura_prefs_bad");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("preferences.toml");
        std::fs::write(&path, "= broken").unwrap();

        let err = PreferenceStore::open(path.clone()).unwrap_err();
        assert!(matches!(err, SakuraError::PreferenceError(_)));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
