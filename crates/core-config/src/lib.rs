//! Configuration loading and parsing.
//!
//! Settings live in `slate.toml`. Lookup prefers the working directory,
//! then the platform config dir (XDG / AppData Roaming). A missing or
//! malformed file falls back to defaults; unknown fields are ignored so
//! old binaries tolerate newer config files.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Draw the line-number gutter to the left of the text area.
    #[serde(default = "default_true")]
    pub line_numbers: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Carry the current line's indentation onto new lines.
    #[serde(default = "default_true")]
    pub autoindent: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { line_numbers: true }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { autoindent: true }
    }
}

const fn default_true() -> bool {
    true
}

/// Best-effort config path following platform conventions.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("slate.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("slate").join("slate.toml");
    }
    PathBuf::from("slate.toml")
}

/// Load from an explicit path, or from [`discover`] when none is given.
/// Never fails on file problems: defaults cover every degraded case.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(config) => Ok(config),
            Err(error) => {
                warn!(
                    target: "config",
                    path = %path.display(),
                    %error,
                    "config_parse_failed"
                );
                Ok(Config::default())
            }
        },
        Err(_) => Ok(Config::default()),
    }
}
