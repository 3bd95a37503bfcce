//! Process-wide runtime loader.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::memo::{LoadPhase, Memo};
use crate::{LoadError, LoadFut, LoaderOptions, RuntimeHandle, RuntimeProvider, ScriptHost};

/// Single shared, lazily initialized handle to the scripting runtime.
///
/// Failure policy: an attempt that fails is delivered to every caller that
/// joined it and recorded as [`LoadPhase::Failed`]; the next
/// [`acquire`](Self::acquire) starts a new attempt. A bootstrap injected by a
/// failed attempt stays injected and is not fetched again.
pub struct RuntimeLoader {
    host: Arc<dyn ScriptHost>,
    bootstrap_url: Url,
    options: LoaderOptions,
    runtime: Memo<RuntimeHandle>,
}

impl RuntimeLoader {
    pub fn new(host: Arc<dyn ScriptHost>, bootstrap_url: Url, options: LoaderOptions) -> Self {
        Self {
            host,
            bootstrap_url,
            options,
            runtime: Memo::new(),
        }
    }

    pub async fn acquire(&self) -> Result<RuntimeHandle, LoadError> {
        self.runtime
            .get_or_load(|| {
                Box::pin(load_runtime(
                    Arc::clone(&self.host),
                    self.bootstrap_url.clone(),
                    self.options.clone(),
                ))
            })
            .await
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.runtime.phase()
    }

    /// The error of the most recent attempt, while the loader sits in
    /// [`LoadPhase::Failed`].
    #[must_use]
    pub fn last_error(&self) -> Option<LoadError> {
        self.runtime.last_error()
    }

    #[must_use]
    pub fn bootstrap_url(&self) -> &Url {
        &self.bootstrap_url
    }

    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }
}

impl RuntimeProvider for RuntimeLoader {
    fn acquire(&self) -> LoadFut<'_, RuntimeHandle> {
        Box::pin(RuntimeLoader::acquire(self))
    }

    fn phase(&self) -> LoadPhase {
        RuntimeLoader::phase(self)
    }
}

async fn load_runtime(
    host: Arc<dyn ScriptHost>,
    bootstrap_url: Url,
    options: LoaderOptions,
) -> Result<RuntimeHandle, LoadError> {
    info!(bootstrap = %bootstrap_url, index = %options.index_url, "Loading runtime");

    if host.is_injected(&bootstrap_url) {
        debug!(bootstrap = %bootstrap_url, "Bootstrap already present");
    } else {
        host.inject(&bootstrap_url).await.inspect_err(|err| {
            warn!(bootstrap = %bootstrap_url, "Bootstrap load failed: {err}");
        })?;
    }

    let Some(entry) = host.entry_point() else {
        warn!(bootstrap = %bootstrap_url, "No runtime loader after bootstrap");
        return Err(LoadError::EntryPointMissing);
    };

    let handle = entry.load(options).await.inspect_err(|err| {
        warn!("Runtime initialization failed: {err}");
    })?;
    info!(runtime = %handle.describe(), "Runtime ready");
    Ok(handle)
}
