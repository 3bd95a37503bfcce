//! Model inspector state machine.
//!
//! ```text
//! Idle ──begin──▶ Loading | Running ──apply(Ok)──▶ Ready
//!                        │
//!                        └──────apply(Err)──────▶ Error
//! Ready | Error ──begin──▶ Running ...
//! ```
//!
//! An action is split in two so the page can run it off the UI thread:
//! [`ModelInspector::begin`] performs the synchronous transition and returns a
//! self-contained [`PendingAction`]; its [`run`](PendingAction::run) future
//! produces an [`ActionOutcome`] that [`ModelInspector::apply`] folds back in.
//! Outcomes carry the ticket they were issued under, and only the outcome of
//! the action currently in flight is applied.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use trinity_runtime::{LoadPhase, RuntimeProvider};
use trinity_types::{Flag, InspectionStatus, Verdict, VerdictInputs};

use crate::error::InspectError;
use crate::marker::MarkerPattern;
use crate::source::ModelSource;

/// Interrogates the runtime about itself.
pub const DIAGNOSTIC_SNIPPET: &str = r#"import sys, platform
f"Hello from Python!\nPython {platform.python_version()}\nSys: {sys.version.split()[0]}"
"#;

/// Log shown when a model runs but produces no value.
pub const EMPTY_RESULT_LOG: &str = "Model executed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Automatic runtime acquisition when the page is first shown.
    Initialize,
    Diagnostic,
    InspectModel,
}

impl Action {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Action::Initialize => "Initialize runtime",
            Action::Diagnostic => "Run Python diagnostic",
            Action::InspectModel => "Inspect external model",
        }
    }

    const fn busy_status(self) -> InspectionStatus {
        match self {
            Action::Initialize => InspectionStatus::Loading,
            Action::Diagnostic | Action::InspectModel => InspectionStatus::Running,
        }
    }

    /// Shown when a failure carries no message of its own.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Action::Initialize => "Failed to initialize Python runtime.",
            Action::Diagnostic => "Execution failed.",
            Action::InspectModel => "Failed to run model.",
        }
    }
}

/// Identifies one started action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTicket {
    pub action: Action,
    pub generation: u64,
}

/// Result of a finished action, waiting to be applied.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub ticket: ActionTicket,
    /// `Ok(None)` leaves the log untouched.
    pub result: Result<Option<String>, InspectError>,
}

/// A started action that owns everything it needs to run.
pub struct PendingAction {
    ticket: ActionTicket,
    runtime: Arc<dyn RuntimeProvider>,
    models: Arc<dyn ModelSource>,
    model_url: Url,
    marker: MarkerPattern,
}

impl PendingAction {
    #[must_use]
    pub fn ticket(&self) -> ActionTicket {
        self.ticket
    }

    pub async fn run(self) -> ActionOutcome {
        let result = match self.ticket.action {
            Action::Initialize => self
                .runtime
                .acquire()
                .await
                .map(|_| None)
                .map_err(InspectError::from),
            Action::Diagnostic => self.diagnostic().await.map(Some),
            Action::InspectModel => self.inspect().await.map(Some),
        };
        ActionOutcome {
            ticket: self.ticket,
            result,
        }
    }

    async fn diagnostic(&self) -> Result<String, InspectError> {
        let runtime = self.runtime.acquire().await?;
        Ok(runtime.execute(DIAGNOSTIC_SNIPPET).await?)
    }

    async fn inspect(&self) -> Result<String, InspectError> {
        let text = self.models.fetch_text(&self.model_url).await?;

        if self.marker.is_match(&text) {
            info!(
                module = self.marker.module(),
                bytes = text.len(),
                "Model imports an unavailable module; not executing"
            );
            return Ok(unavailable_module_explanation(
                &model_file_name(&self.model_url),
                text.len(),
                self.marker.module(),
            ));
        }

        let runtime = self.runtime.acquire().await?;
        let output = runtime.execute(&text).await?;
        if output.is_empty() {
            Ok(EMPTY_RESULT_LOG.to_string())
        } else {
            Ok(output)
        }
    }
}

pub struct ModelInspector {
    runtime: Arc<dyn RuntimeProvider>,
    models: Arc<dyn ModelSource>,
    model_url: Url,
    marker: MarkerPattern,
    status: InspectionStatus,
    log: String,
    error: Option<String>,
    inputs: VerdictInputs,
    generation: u64,
    in_flight: Option<ActionTicket>,
}

impl ModelInspector {
    pub fn new(
        runtime: Arc<dyn RuntimeProvider>,
        models: Arc<dyn ModelSource>,
        model_url: Url,
        marker: MarkerPattern,
    ) -> Self {
        Self {
            runtime,
            models,
            model_url,
            marker,
            status: InspectionStatus::Idle,
            log: String::new(),
            error: None,
            inputs: VerdictInputs::default(),
            generation: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> InspectionStatus {
        self.status
    }

    #[must_use]
    pub fn log(&self) -> &str {
        &self.log
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn inputs(&self) -> VerdictInputs {
        self.inputs
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.inputs.verdict()
    }

    #[must_use]
    pub fn model_url(&self) -> &Url {
        &self.model_url
    }

    #[must_use]
    pub fn marker(&self) -> &MarkerPattern {
        &self.marker
    }

    #[must_use]
    pub fn runtime_phase(&self) -> LoadPhase {
        self.runtime.phase()
    }

    /// The action currently in flight, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<Action> {
        self.in_flight.map(|ticket| ticket.action)
    }

    pub fn toggle(&mut self, flag: Flag) -> Verdict {
        self.inputs.toggle(flag);
        self.verdict()
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) -> Verdict {
        self.inputs.set(flag, value);
        self.verdict()
    }

    /// Start `action`, or `None` while another action is loading or running.
    pub fn begin(&mut self, action: Action) -> Option<PendingAction> {
        if self.status.is_busy() {
            debug!(?action, status = %self.status, "Ignoring action while busy");
            return None;
        }

        self.generation += 1;
        let ticket = ActionTicket {
            action,
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        self.error = None;
        self.status = action.busy_status();
        debug!(?action, generation = ticket.generation, "Action started");

        Some(PendingAction {
            ticket,
            runtime: Arc::clone(&self.runtime),
            models: Arc::clone(&self.models),
            model_url: self.model_url.clone(),
            marker: self.marker.clone(),
        })
    }

    /// Fold a finished action back in. Returns `false` for an outcome that
    /// does not belong to the action in flight.
    pub fn apply(&mut self, outcome: ActionOutcome) -> bool {
        if self.in_flight != Some(outcome.ticket) {
            debug!(
                action = ?outcome.ticket.action,
                generation = outcome.ticket.generation,
                current = self.generation,
                "Dropping stale action result"
            );
            return false;
        }
        self.in_flight = None;

        let action = outcome.ticket.action;
        match outcome.result {
            Ok(log) => {
                if let Some(log) = log {
                    self.log = log;
                }
                self.status = InspectionStatus::Ready;
            }
            Err(err) => {
                let message = err.to_string();
                warn!(?action, "Action failed: {message}");
                self.error = Some(if message.trim().is_empty() {
                    action.fallback_message().to_string()
                } else {
                    message
                });
                self.status = InspectionStatus::Error;
            }
        }
        true
    }

    /// Run `action` to completion in place.
    pub async fn perform(&mut self, action: Action) -> bool {
        let Some(pending) = self.begin(action) else {
            return false;
        };
        let outcome = pending.run().await;
        self.apply(outcome)
    }

    pub async fn initialize(&mut self) -> bool {
        self.perform(Action::Initialize).await
    }

    pub async fn run_diagnostic(&mut self) -> bool {
        self.perform(Action::Diagnostic).await
    }

    pub async fn inspect_external_model(&mut self) -> bool {
        self.perform(Action::InspectModel).await
    }
}

/// Last path segment of the model URL, for display.
fn model_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// Explanation shown instead of running a model that needs `module`.
#[must_use]
pub fn unavailable_module_explanation(file_name: &str, bytes: usize, module: &str) -> String {
    format!(
        "Loaded {file_name} ({bytes} bytes).

This model imports '{module}', which the local runtime does not provide, so it was not executed.
Install the solver bindings and run the model directly to reproduce its checks.

Teaching verdicts from the formal model:
  - Base Nicene axioms: SAT
  - Modalism (F = S): UNSAT
  - Tritheism (E2 \u{2260} E): UNSAT
  - Subordinationism (Son lacks an essential attribute): UNSAT"
    )
}
