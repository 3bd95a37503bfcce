//! Lazily loaded scripting runtime for the Trinity model page.
//!
//! The runtime is expensive to bring up and the environment it lives in only
//! allows its bootstrap script to be installed once, so a process holds a
//! single [`RuntimeLoader`]. Every caller goes through
//! [`RuntimeLoader::acquire`], which:
//!
//! 1. Makes sure the bootstrap script is present in the [`ScriptHost`],
//!    injecting it at most once.
//! 2. Asks the host for the loader entry point the bootstrap exposes and
//!    invokes it with [`LoaderOptions`] (the base URL of supporting assets).
//! 3. Caches the resulting [`RuntimeHandle`].
//!
//! Concurrent callers share one in-flight future and observe the same result.
//! A failed load is remembered as failed, but does not poison the loader: the
//! next `acquire` after the failure has settled starts a fresh attempt.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`error`] | `LoadError` and `ExecutionError` |
//! | [`handle`] | `RuntimeHandle` and the `ScriptRuntime` seam |
//! | [`host`] | `ScriptHost` / `RuntimeEntry` seams |
//! | [`loader`] | `RuntimeLoader`, the process-wide memoized accessor |
//! | [`http_host`] | Host that downloads the bootstrap over HTTP into a cache dir |
//! | [`python`] | Entry point and runtime backed by a local CPython process |

pub mod error;
pub mod handle;
pub mod host;
pub mod http_host;
pub mod loader;
mod memo;
pub mod python;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

pub use error::{ExecutionError, LoadError};
pub use handle::{ExecFut, RuntimeHandle, ScriptRuntime};
pub use host::{LoaderOptions, RuntimeEntry, ScriptHost};
pub use http_host::HttpScriptHost;
pub use loader::RuntimeLoader;
pub use memo::LoadPhase;
pub use python::{INDEX_URL_ENV, PythonEntry, PythonRuntime, resolve_interpreter};

/// Runtime loading future type alias.
pub type LoadFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, LoadError>> + Send + 'a>>;

/// Capability to obtain the runtime.
///
/// Consumers hold this instead of reaching for a global, so tests can hand
/// them a fake.
pub trait RuntimeProvider: Send + Sync {
    fn acquire(&self) -> LoadFut<'_, RuntimeHandle>;

    /// Current load state, for display.
    fn phase(&self) -> LoadPhase {
        LoadPhase::NotStarted
    }
}

static PROCESS_LOADER: OnceLock<Arc<RuntimeLoader>> = OnceLock::new();

/// The process-wide loader. `init` runs only for the first caller.
pub fn process_loader(init: impl FnOnce() -> RuntimeLoader) -> Arc<RuntimeLoader> {
    Arc::clone(PROCESS_LOADER.get_or_init(|| Arc::new(init())))
}
