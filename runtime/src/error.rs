//! Runtime errors.

use thiserror::Error;

/// Why the runtime could not be brought up.
///
/// `Clone` because one failure is delivered to every caller that joined the
/// same load attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The bootstrap script could not be fetched or installed.
    #[error("failed to load runtime bootstrap: {0}")]
    BootstrapFailed(String),
    /// The bootstrap was installed but exposes no loader entry point.
    #[error("runtime loader not found after bootstrap load")]
    EntryPointMissing,
    /// The entry point ran but did not produce a usable runtime.
    #[error("runtime initialization failed: {0}")]
    InitFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("failed to start runtime process: {0}")]
    Spawn(String),
    /// The executed source raised; carries the runtime's own message.
    #[error("{0}")]
    Raised(String),
}
