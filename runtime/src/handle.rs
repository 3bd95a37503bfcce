use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::ExecutionError;

/// Execution future type alias.
pub type ExecFut<'a> = Pin<Box<dyn Future<Output = Result<String, ExecutionError>> + Send + 'a>>;

/// An initialized scripting environment.
pub trait ScriptRuntime: Send + Sync {
    /// Short human-readable identification (e.g. `"CPython 3.12.3"`).
    fn describe(&self) -> String;

    /// Run `source` and return the textual result.
    fn execute<'a>(&'a self, source: &'a str) -> ExecFut<'a>;
}

/// Shared capability for an initialized runtime.
///
/// Cheap to clone; every clone refers to the same runtime, which lives until
/// the process exits.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Arc<dyn ScriptRuntime>,
}

impl RuntimeHandle {
    pub fn new(runtime: impl ScriptRuntime + 'static) -> Self {
        Self {
            inner: Arc::new(runtime),
        }
    }

    pub async fn execute(&self, source: &str) -> Result<String, ExecutionError> {
        self.inner.execute(source).await
    }

    #[must_use]
    pub fn describe(&self) -> String {
        self.inner.describe()
    }

    /// Whether both handles refer to the same runtime instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuntimeHandle")
            .field(&self.inner.describe())
            .finish()
    }
}
