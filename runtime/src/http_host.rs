//! Script host that installs bootstrap scripts from HTTP into a cache directory.
//!
//! "Injecting" a bootstrap means downloading it and materializing it
//! atomically under the cache directory. The host remembers every injected URL
//! for the lifetime of the process; concurrent injections of the same URL share
//! one download.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::StatusCode;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::Url;

use trinity_utils::{FileSync, WriteOptions, atomic_write_with_options};

use crate::memo::{LoadPhase, Memo};
use crate::python::{PythonEntry, resolve_interpreter};
use crate::{LoadError, LoadFut, RuntimeEntry, ScriptHost};

const USER_AGENT: &str = concat!("trinity-runtime/", env!("CARGO_PKG_VERSION"));

pub struct HttpScriptHost {
    client: reqwest::Client,
    cache_dir: PathBuf,
    interpreter: String,
    injections: Mutex<HashMap<Url, Arc<Memo<PathBuf>>>>,
    /// Most recently installed bootstrap; the entry point runs this one.
    installed: Mutex<Option<PathBuf>>,
}

impl HttpScriptHost {
    pub fn new(cache_dir: impl Into<PathBuf>, interpreter: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("Falling back to default HTTP client: {err}");
                reqwest::Client::new()
            });
        Self::with_client(client, cache_dir, interpreter)
    }

    pub fn with_client(
        client: reqwest::Client,
        cache_dir: impl Into<PathBuf>,
        interpreter: impl Into<String>,
    ) -> Self {
        Self {
            client,
            cache_dir: cache_dir.into(),
            interpreter: interpreter.into(),
            injections: Mutex::new(HashMap::new()),
            installed: Mutex::new(None),
        }
    }

    /// Where the bootstrap from `url` is materialized.
    #[must_use]
    pub fn script_path(&self, url: &Url) -> PathBuf {
        self.cache_dir.join(cache_file_name(url))
    }

    #[must_use]
    pub fn installed_script(&self) -> Option<PathBuf> {
        lock(&self.installed).clone()
    }

    fn injection(&self, url: &Url) -> Arc<Memo<PathBuf>> {
        Arc::clone(
            lock(&self.injections)
                .entry(url.clone())
                .or_insert_with(|| Arc::new(Memo::new())),
        )
    }
}

impl ScriptHost for HttpScriptHost {
    fn is_injected(&self, url: &Url) -> bool {
        lock(&self.injections)
            .get(url)
            .is_some_and(|memo| memo.phase() == LoadPhase::Ready)
    }

    fn inject<'a>(&'a self, url: &'a Url) -> LoadFut<'a, ()> {
        Box::pin(async move {
            let memo = self.injection(url);
            let path = memo
                .get_or_load(|| {
                    Box::pin(download_script(
                        self.client.clone(),
                        url.clone(),
                        self.script_path(url),
                    ))
                })
                .await?;
            *lock(&self.installed) = Some(path);
            Ok(())
        })
    }

    fn entry_point(&self) -> Option<Arc<dyn RuntimeEntry>> {
        let bootstrap = self.installed_script()?;
        let Some(interpreter) = resolve_interpreter(&self.interpreter) else {
            debug!(interpreter = %self.interpreter, "Interpreter not found on PATH");
            return None;
        };
        Some(Arc::new(PythonEntry::new(interpreter, bootstrap)))
    }
}

async fn download_script(
    client: reqwest::Client,
    url: Url,
    dest: PathBuf,
) -> Result<PathBuf, LoadError> {
    debug!(%url, "Fetching bootstrap script");
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|err| LoadError::BootstrapFailed(format!("failed to fetch {url}: {err}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::BootstrapFailed(format!(
            "HTTP {} fetching {url}",
            status_line(status)
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| LoadError::BootstrapFailed(format!("failed to read {url}: {err}")))?;
    if body.is_empty() {
        return Err(LoadError::BootstrapFailed(format!(
            "empty bootstrap script at {url}"
        )));
    }

    let path = dest.clone();
    tokio::task::spawn_blocking(move || write_script(&path, &body))
        .await
        .map_err(|err| LoadError::BootstrapFailed(format!("install task failed: {err}")))?
        .map_err(|err| {
            LoadError::BootstrapFailed(format!("failed to install {}: {err}", dest.display()))
        })?;

    info!(%url, path = %dest.display(), "Bootstrap installed");
    Ok(dest)
}

fn write_script(path: &Path, body: &[u8]) -> std::io::Result<()> {
    atomic_write_with_options(
        path,
        body,
        WriteOptions {
            sync: FileSync::SyncAll,
            mode: Some(0o644),
            create_parents: true,
        },
    )
}

/// `"404 Not Found"`, or just the code when it has no canonical reason.
pub(crate) fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn cache_file_name(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let key: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
    format!("bootstrap-{key}.py")
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
