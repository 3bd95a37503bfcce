//! Seams between the loader and the environment it installs scripts into.

use std::sync::Arc;

use url::Url;

use crate::{LoadFut, RuntimeHandle};

/// Configuration handed to the loader entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Base URL of the supporting runtime assets. Must carry the same version
    /// as the bootstrap script.
    pub index_url: Url,
}

/// The execution environment the bootstrap script is injected into.
///
/// Injection is a process-wide side effect. Implementations must make
/// `inject` idempotent: concurrent calls for the same URL share one pending
/// operation and a completed injection is never repeated.
pub trait ScriptHost: Send + Sync {
    /// Whether the script at `url` has already been injected.
    fn is_injected(&self, url: &Url) -> bool;

    fn inject<'a>(&'a self, url: &'a Url) -> LoadFut<'a, ()>;

    /// The loader entry point exposed by an injected bootstrap, if any.
    fn entry_point(&self) -> Option<Arc<dyn RuntimeEntry>>;
}

/// Loader entry point exposed by the bootstrap script.
pub trait RuntimeEntry: Send + Sync {
    fn load(&self, options: LoaderOptions) -> LoadFut<'_, RuntimeHandle>;
}
