//! Error types for Sakura

use thiserror::Error;

/// The main error type for Sakura operations
#[derive(Debug, Error)]
pub enum SakuraError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Invalid color token: {0}")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Preference error: {0}")]
    PreferenceError(String),

    #[error("Countdown error: {0}")]
    CountdownError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Audio error: {0}")]
    AudioError(String),

    #[error("Unknown scene: {value} is not one of {allowed:?}")]
    UnknownScene {
        value: String,
        allowed: Vec<String>,
    },
}

/// Result type alias for Sakura operations
pub type Result<T> = std::result::Result<T, SakuraError>;

impl From<toml::de::Error> for SakuraError {
    fn from(err: toml::de::Error) -> Self {
        SakuraError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for SakuraError {
    fn from(err: toml::ser::Error) -> Self {
        SakuraError::TomlSerError(err.to_string())
    }
}
