use std::path::{Path, PathBuf};

use phoney_generate::{GenerateOptions, LocaleKey};
use serde::{Deserialize, Serialize};

use super::atomic::write_bytes_atomic;
use super::{ConfigError, ConfigResult};

/// Settings file read from the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "phoney.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: GenerateOptions,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            file: None,
        }
    }
}

impl Settings {
    /// Apply `PHONEY_*` overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(locale) = lookup("PHONEY_DEFAULT_LOCALE") {
            self.engine.default_locale = locale;
        }
        if let Some(value) = lookup("PHONEY_MAX_COUNT") {
            self.engine.max_count = parse_usize("PHONEY_MAX_COUNT", &value)?;
        }
        if let Some(value) = lookup("PHONEY_MAX_ARRAY_COUNT") {
            self.engine.max_array_count = parse_usize("PHONEY_MAX_ARRAY_COUNT", &value)?;
        }
        if let Some(value) = lookup("PHONEY_CONCURRENCY") {
            self.engine.concurrency = parse_usize("PHONEY_CONCURRENCY", &value)?;
        }
        if let Some(level) = lookup("PHONEY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = lookup("PHONEY_LOG_JSON") {
            self.logging.json = parse_bool("PHONEY_LOG_JSON", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if LocaleKey::parse(&self.engine.default_locale).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unsupported default_locale '{}'",
                self.engine.default_locale
            )));
        }
        for (key, value) in [
            ("max_count", self.engine.max_count),
            ("max_array_count", self.engine.max_array_count),
            ("concurrency", self.engine.concurrency),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{key} must be at least 1")));
            }
        }
        Ok(())
    }
}

/// Load settings from `explicit`, else from [`DEFAULT_SETTINGS_FILE`] when it
/// exists, else defaults; then apply environment overrides.
pub fn load_settings(explicit: Option<&Path>) -> ConfigResult<Settings> {
    let mut settings = match explicit {
        Some(path) => read_settings(path)?,
        None => {
            let path = Path::new(DEFAULT_SETTINGS_FILE);
            if path.exists() {
                read_settings(path)?
            } else {
                Settings::default()
            }
        }
    };
    settings.apply_env(|key| std::env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
}

/// Write default settings to `path`. Refuses to overwrite unless `force`.
pub fn init_settings(path: &Path, force: bool) -> ConfigResult<Settings> {
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let settings = Settings::default();
    let encoded = toml::to_string_pretty(&settings)?;
    write_bytes_atomic(path, encoded.as_bytes())?;
    Ok(settings)
}

fn read_settings(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

fn parse_usize(key: &str, value: &str) -> ConfigResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key} must be a positive integer, got '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}
