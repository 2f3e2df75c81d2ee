//! Themes as named tables of colour tokens

use sakura_core::{Result, Rgba, SakuraError};
use std::collections::BTreeMap;

/// Theme used when no preference is stored
pub const DEFAULT_THEME: &str = "moon";

/// Named colour tokens, e.g. `petal-color = "255,183,197"`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleTokens {
    tokens: BTreeMap<String, String>,
}

impl StyleTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in moon palette
    pub fn moon() -> Self {
        let mut tokens = Self::new();
        tokens.set("petal-color", "255,183,197");
        tokens.set("glow-color", "255,200,220");
        tokens.set("accent-color", "#ffd6e3");
        tokens.set("background", "#0b1026");
        tokens
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tokens.insert(name.into(), value.into());
    }

    /// Token text, treating blank values as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Resolve a colour token, falling back to `fallback` when the token is
    /// missing, blank, or unparseable.
    pub fn color_or(&self, name: &str, fallback: &str) -> Rgba {
        if let Some(text) = self.get(name) {
            match Rgba::parse_token(text) {
                Ok(color) => return color,
                Err(e) => log::debug!("style token {name}: {e}, using default"),
            }
        }
        Rgba::parse_token(fallback).unwrap_or(Rgba::WHITE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// All known themes, iterated in name order
#[derive(Clone, Debug)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, StyleTokens>,
    fallback: StyleTokens,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeRegistry {
    /// Registry holding only the built-in moon theme
    pub fn new() -> Self {
        let mut themes = BTreeMap::new();
        themes.insert(DEFAULT_THEME.to_string(), StyleTokens::moon());
        Self {
            themes,
            fallback: StyleTokens::moon(),
        }
    }

    /// Build from a `[themes]` table: one sub-table of string tokens per theme.
    ///
    /// Config themes are added on top of the built-in one and may replace it.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut registry = Self::new();
        for (name, value) in table {
            let entries = value.as_table().ok_or_else(|| {
                SakuraError::ConfigError(format!("theme '{name}' must be a table"))
            })?;
            let mut tokens = StyleTokens::new();
            for (key, token) in entries {
                match token.as_str() {
                    Some(s) => tokens.set(key.clone(), s),
                    None => log::warn!("theme '{name}': token '{key}' is not a string, ignored"),
                }
            }
            registry.insert(name.clone(), tokens);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, tokens: StyleTokens) {
        self.themes.insert(name.into(), tokens);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Tokens for `name`; unknown themes resolve to the default palette
    pub fn resolve(&self, name: &str) -> &StyleTokens {
        self.themes.get(name).unwrap_or(&self.fallback)
    }

    pub fn names(&self) -> Vec<&str> {
        self.themes.keys().map(|k| k.as_str()).collect()
    }

    /// Theme after `current` in name order, wrapping around
    pub fn next_after(&self, current: &str) -> String {
        let names = self.names();
        let next = match names.iter().position(|n| *n == current) {
            Some(i) => names[(i + 1) % names.len()],
            None => names.first().copied().unwrap_or(DEFAULT_THEME),
        };
        next.to_string()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleTokens)> {
        self.themes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_falls_back() {
        let mut tokens = StyleTokens::new();
        tokens.set("petal-color", "   ");
        let c = tokens.color_or("petal-color", "255,183,197");
        assert_eq!(c.to_rgba8(), [255, 183, 197, 255]);
    }

    #[test]
    fn garbage_token_falls_back() {
        let mut tokens = StyleTokens::new();
        tokens.set("accent-color", "not a colour");
        let c = tokens.color_or("accent-color", "#ffd6e3");
        assert_eq!(c.to_rgba8(), [0xff, 0xd6, 0xe3, 255]);
    }

    #[test]
    fn present_token_wins() {
        let tokens = StyleTokens::moon();
        let c = tokens.color_or("glow-color", "0,0,0");
        assert_eq!(c.to_rgba8(), [255, 200, 220, 255]);
    }

    #[test]
    fn registry_from_toml() {
        let table: toml::value::Table = toml::from_str(
            r##"
            [sunset]
            petal-color = "255,150,120"
            accent-color = "#ffb38a"
            weight = 3
            "##,
        )
        .unwrap();
        let registry = ThemeRegistry::from_toml(&table).unwrap();
        assert_eq!(registry.names(), vec!["moon", "sunset"]);
        let sunset = registry.resolve("sunset");
        assert_eq!(sunset.get("accent-color"), Some("#ffb38a"));
        assert_eq!(sunset.len(), 2);
    }

    #[test]
    fn registry_rejects_non_table_theme() {
        let table: toml::value::Table = toml::from_str("sunset = 3").unwrap();
        assert!(ThemeRegistry::from_toml(&table).is_err());
    }

    #[test]
    fn unknown_theme_resolves_to_default() {
        let registry = ThemeRegistry::new();
        assert_eq!(registry.resolve("nope"), &StyleTokens::moon());
    }

    #[test]
    fn next_after_wraps_in_name_order() {
        let mut registry = ThemeRegistry::new();
        registry.insert("dawn", StyleTokens::new());
        registry.insert("sunset", StyleTokens::new());
        assert_eq!(registry.next_after("dawn"), "moon");
        assert_eq!(registry.next_after("moon"), "sunset");
        assert_eq!(registry.next_after("sunset"), "dawn");
        assert_eq!(registry.next_after("missing"), "dawn");
    }
}
