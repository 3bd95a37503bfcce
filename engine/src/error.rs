use thiserror::Error;
use trinity_runtime::{ExecutionError, LoadError};

use crate::source::FetchError;

/// Any failure of a page action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InspectError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
