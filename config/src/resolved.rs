//! Resolved configuration.
//!
//! Converts the optional, boundary-level [`TrinityConfig`] into concrete
//! values: URLs parsed and joined, defaults applied, names validated.

use std::path::PathBuf;

use url::Url;

use trinity_types::{UiMode, UiOptions};

use crate::env::expand_with;
use crate::{ConfigError, TrinityConfig};

pub const DEFAULT_SITE_URL: &str = "http://localhost:5173/";
pub const DEFAULT_MODEL_PATH: &str = "/trinity_formal_model.py";
pub const DEFAULT_RUNTIME_VERSION: &str = "v1";
pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_MARKER_MODULE: &str = "z3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// `<runtime base>/<version>/bootstrap.py`
    pub bootstrap_url: Url,
    /// `<runtime base>/<version>/`, handed to the runtime entry point.
    pub index_url: Url,
    pub version: String,
    pub interpreter: String,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub ui_mode: UiMode,
    pub ui_options: UiOptions,
    pub model_url: Url,
    pub runtime: RuntimeSettings,
    pub marker_module: String,
}

impl ResolvedConfig {
    pub fn resolve(config: &TrinityConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    pub(crate) fn resolve_with(
        config: &TrinityConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let expand = |value: &str| expand_with(value, &lookup);
        let app = config.app.as_ref();
        let site = config.site.as_ref();
        let runtime = config.runtime.as_ref();

        let ui_mode = match app.and_then(|a| a.ui.as_deref()) {
            Some(raw) => raw
                .parse::<UiMode>()
                .map_err(|err| ConfigError::InvalidValue {
                    field: "app.ui",
                    reason: err.to_string(),
                })?,
            None => UiMode::default(),
        };
        let ui_options = UiOptions {
            ascii_only: app.is_some_and(|a| a.ascii_only),
            high_contrast: app.is_some_and(|a| a.high_contrast),
            reduced_motion: app.is_some_and(|a| a.reduced_motion),
        };

        let site_url = non_empty(site.and_then(|s| s.base_url.as_deref()).map(expand))
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let site_url = parse_directory_url("site.base_url", &site_url)?;

        let model_path = non_empty(site.and_then(|s| s.model_path.as_deref()).map(expand))
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());
        let model_url = join("site.model_path", &site_url, &model_path)?;

        let runtime_base = match non_empty(runtime.and_then(|r| r.base_url.as_deref()).map(expand))
        {
            Some(raw) => parse_directory_url("runtime.base_url", &raw)?,
            None => join("runtime.base_url", &site_url, "runtime/")?,
        };

        let version = non_empty(runtime.and_then(|r| r.version.as_deref()).map(expand))
            .unwrap_or_else(|| DEFAULT_RUNTIME_VERSION.to_string());
        if version.contains(['/', '\\', '?', '#']) || version == "." || version == ".." {
            return Err(ConfigError::InvalidValue {
                field: "runtime.version",
                reason: format!("'{version}' must be a single path segment"),
            });
        }
        let index_url = join("runtime.version", &runtime_base, &format!("{version}/"))?;
        let bootstrap_url = join("runtime.version", &index_url, "bootstrap.py")?;

        let interpreter = non_empty(runtime.and_then(|r| r.interpreter.as_deref()).map(expand))
            .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());

        let cache_dir = runtime
            .and_then(|r| r.cache_dir.clone())
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("trinity").join("runtime")))
            .unwrap_or_else(|| PathBuf::from(".trinity").join("runtime"));

        let marker_module = non_empty(
            config
                .inspector
                .as_ref()
                .and_then(|i| i.marker_module.as_deref())
                .map(expand),
        )
        .unwrap_or_else(|| DEFAULT_MARKER_MODULE.to_string());
        if !is_module_name(&marker_module) {
            return Err(ConfigError::InvalidValue {
                field: "inspector.marker_module",
                reason: format!("'{marker_module}' is not a dotted Python module name"),
            });
        }

        Ok(Self {
            ui_mode,
            ui_options,
            model_url,
            runtime: RuntimeSettings {
                bootstrap_url,
                index_url,
                version,
                interpreter,
                cache_dir,
            },
            marker_module,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a URL that other paths are joined onto; forces a trailing slash so
/// `Url::join` appends instead of replacing the last segment.
fn parse_directory_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: raw.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn join(field: &'static str, base: &Url, path: &str) -> Result<Url, ConfigError> {
    base.join(path).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: path.to_string(),
        source,
    })
}

fn is_module_name(name: &str) -> bool {
    name.split('.').all(|part| {
        let mut chars = part.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
