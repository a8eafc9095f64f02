use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::input::default_dataset_path;

pub const DEFAULT_CONFIG_FILE: &str = "dsp-radar.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("toml parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Dataset artifact path; falls back to the bundled location.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    #[serde(default)]
    pub defaults: ComparisonDefaults,
}

/// Countries preselected in a comparison when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ComparisonDefaults {
    pub primary: String,
    pub secondary: String,
}

impl Default for ComparisonDefaults {
    fn default() -> Self {
        Self {
            primary: "United States of America".to_string(),
            secondary: "Bangladesh".to_string(),
        }
    }
}

impl Settings {
    pub fn dataset_path(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        self.dataset.clone().unwrap_or_else(default_dataset_path)
    }
}

pub fn parse_settings(text: &str, path: &Path) -> Result<Settings, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text, path)
}

/// An explicit path must exist; otherwise `./dsp-radar.toml` is used when present.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        return load_settings(path);
    }
    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return load_settings(local);
    }
    Ok(Settings::default())
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
