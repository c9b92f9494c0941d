mod atomic;
mod settings;

pub use atomic::write_bytes_atomic;
pub use settings::{
    DEFAULT_SETTINGS_FILE, LoggingSettings, Settings, init_settings, load_settings,
};

use thiserror::Error;

/// Errors raised while loading or writing settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
