//! Configuration for the Trinity model page.
//!
//! The on-disk format is TOML at `~/.trinity/config.toml`. Every field is
//! optional; [`ResolvedConfig`] fills in defaults and validates URLs once at
//! startup so the rest of the application never handles `Option`s.
//!
//! ```toml
//! [app]
//! ui = "full"
//! high_contrast = false
//! ascii_only = false
//! reduced_motion = false
//!
//! [site]
//! base_url = "http://localhost:5173"
//! model_path = "/trinity_formal_model.py"
//!
//! [runtime]
//! base_url = "${TRINITY_RUNTIME_BASE}"
//! version = "v1"
//! interpreter = "python3"
//!
//! [inspector]
//! marker_module = "z3"
//! ```

mod env;
mod resolved;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub use env::expand_env_vars;
pub use resolved::{
    DEFAULT_INTERPRETER, DEFAULT_MARKER_MODULE, DEFAULT_MODEL_PATH, DEFAULT_RUNTIME_VERSION,
    DEFAULT_SITE_URL, ResolvedConfig, RuntimeSettings,
};

#[derive(Debug, Default, Deserialize)]
pub struct TrinityConfig {
    pub app: Option<AppConfig>,
    pub site: Option<SiteConfig>,
    pub runtime: Option<RuntimeConfig>,
    pub inspector: Option<InspectorConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// "full" (default) or "headless".
    pub ui: Option<String>,
    /// Use ASCII-only glyphs for checkboxes and status markers.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable spinner animation.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    /// Path of the model script, relative to `base_url`.
    pub model_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RuntimeConfig {
    /// Where versioned runtime assets live. Defaults to `<site>/runtime/`.
    pub base_url: Option<String>,
    /// Asset version; shared by the bootstrap script and the index URL.
    pub version: Option<String>,
    pub interpreter: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InspectorConfig {
    /// Module whose import marks a model as not runnable in the local runtime.
    pub marker_module: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid URL for {field} ('{value}'): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TrinityConfig {
    /// Load the user config. `Ok(None)` when there is no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&content).map(Some).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// `~/.trinity`, home of the config file and logs.
#[must_use]
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".trinity"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("config.toml"))
}
