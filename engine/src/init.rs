//! Wiring the page stack from configuration.

use std::sync::Arc;

use tracing::info;

use trinity_config::ResolvedConfig;
use trinity_runtime::{HttpScriptHost, LoaderOptions, RuntimeLoader, process_loader};

use crate::inspector::ModelInspector;
use crate::marker::MarkerPattern;
use crate::source::HttpModelSource;

/// The process-wide runtime loader, created from `config` on first use.
///
/// Later calls return the existing loader even if `config` differs.
pub fn runtime_loader(config: &ResolvedConfig) -> Arc<RuntimeLoader> {
    process_loader(|| {
        let settings = &config.runtime;
        info!(
            bootstrap = %settings.bootstrap_url,
            cache = %settings.cache_dir.display(),
            interpreter = %settings.interpreter,
            "Creating runtime loader"
        );
        let host = Arc::new(HttpScriptHost::new(
            settings.cache_dir.clone(),
            settings.interpreter.clone(),
        ));
        RuntimeLoader::new(
            host,
            settings.bootstrap_url.clone(),
            LoaderOptions {
                index_url: settings.index_url.clone(),
            },
        )
    })
}

pub fn inspector_from_config(config: &ResolvedConfig) -> Result<ModelInspector, regex::Error> {
    let marker = MarkerPattern::for_module(&config.marker_module)?;
    Ok(ModelInspector::new(
        runtime_loader(config),
        Arc::new(HttpModelSource::new()),
        config.model_url.clone(),
        marker,
    ))
}
