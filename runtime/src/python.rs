//! Runtime backed by a local CPython interpreter.
//!
//! The bootstrap script is a small bridge (see `public/runtime/v1/bootstrap.py`)
//! with two modes: `--handshake` prints a JSON line describing the interpreter,
//! and the default mode executes source read from stdin, writing the value of
//! a trailing expression to stdout. Each `execute` call runs in a fresh
//! interpreter process.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::{
    ExecFut, ExecutionError, LoadError, LoadFut, LoaderOptions, RuntimeEntry, RuntimeHandle,
    ScriptRuntime,
};

/// Environment variable carrying the index URL into the bridge.
pub const INDEX_URL_ENV: &str = "TRINITY_RUNTIME_INDEX_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Handshake {
    runtime: String,
    python: String,
    index_url: String,
}

/// Loader entry point exposed by an installed bridge script.
#[derive(Debug, Clone)]
pub struct PythonEntry {
    interpreter: PathBuf,
    bootstrap: PathBuf,
}

impl PythonEntry {
    pub fn new(interpreter: impl Into<PathBuf>, bootstrap: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            bootstrap: bootstrap.into(),
        }
    }

    async fn handshake(&self, options: &LoaderOptions) -> Result<Handshake, LoadError> {
        let output = Command::new(&self.interpreter)
            .arg(&self.bootstrap)
            .arg("--handshake")
            .env(INDEX_URL_ENV, options.index_url.as_str())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                LoadError::InitFailed(format!(
                    "failed to start {}: {err}",
                    self.interpreter.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LoadError::InitFailed(
                last_line(&stderr).map_or_else(|| output.status.to_string(), str::to_string),
            ));
        }

        let handshake = parse_handshake(&String::from_utf8_lossy(&output.stdout))?;
        if handshake.index_url != options.index_url.as_str() {
            return Err(LoadError::InitFailed(format!(
                "runtime reported index URL {} (expected {})",
                handshake.index_url, options.index_url
            )));
        }
        Ok(handshake)
    }
}

impl RuntimeEntry for PythonEntry {
    fn load(&self, options: LoaderOptions) -> LoadFut<'_, RuntimeHandle> {
        Box::pin(async move {
            let handshake = self.handshake(&options).await?;
            debug!(
                runtime = %handshake.runtime,
                python = %handshake.python,
                "Runtime handshake complete"
            );
            Ok(RuntimeHandle::new(PythonRuntime {
                interpreter: self.interpreter.clone(),
                bootstrap: self.bootstrap.clone(),
                index_url: options.index_url.to_string(),
                python_version: handshake.python,
            }))
        })
    }
}

#[derive(Debug)]
pub struct PythonRuntime {
    interpreter: PathBuf,
    bootstrap: PathBuf,
    index_url: String,
    python_version: String,
}

impl PythonRuntime {
    async fn run(&self, source: &str) -> Result<String, ExecutionError> {
        let mut child = Command::new(&self.interpreter)
            .arg(&self.bootstrap)
            .env(INDEX_URL_ENV, &self.index_url)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ExecutionError::Spawn(err.to_string()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExecutionError::Spawn("stdin was not captured".to_string()))?;
        let feed = async move {
            let written = stdin.write_all(source.as_bytes()).await;
            drop(stdin);
            written
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|err| ExecutionError::Spawn(err.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExecutionError::Raised(
                last_line(&stderr).map_or_else(|| output.status.to_string(), str::to_string),
            ));
        }
        // A broken pipe just means the script exited without reading all input.
        if let Err(err) = written {
            debug!("Runtime closed stdin early: {err}");
        }

        // The bridge writes nothing but the result to stdout.
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ScriptRuntime for PythonRuntime {
    fn describe(&self) -> String {
        format!("CPython {}", self.python_version)
    }

    fn execute<'a>(&'a self, source: &'a str) -> ExecFut<'a> {
        Box::pin(self.run(source))
    }
}

fn parse_handshake(stdout: &str) -> Result<Handshake, LoadError> {
    let line = last_line(stdout)
        .ok_or_else(|| LoadError::InitFailed("runtime printed no handshake".to_string()))?;
    serde_json::from_str(line)
        .map_err(|err| LoadError::InitFailed(format!("malformed runtime handshake: {err}")))
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).rfind(|line| !line.is_empty())
}

/// Locate `name` as a path or on `PATH`.
#[must_use]
pub fn resolve_interpreter(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path = env::var_os("PATH")?;
    env::split_paths(&path).find_map(|dir| {
        let direct = dir.join(name);
        if direct.is_file() {
            return Some(direct);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{name}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}
