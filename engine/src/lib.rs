//! Page state for the Trinity model inspector, without TUI dependencies.
//!
//! [`ModelInspector`] is the state machine behind the page: it owns the
//! status, log and error message, derives the verdict from the three toggles,
//! and runs the two user actions (runtime diagnostic and external model
//! inspection) against a [`RuntimeProvider`](trinity_runtime::RuntimeProvider).
//! [`App`] adds focus handling and runs actions on background tasks.

mod app;
mod dispatch;
mod error;
mod headless;
mod init;
mod inspector;
mod marker;
mod source;

pub use app::{App, Control};
pub use dispatch::ActionDispatcher;
pub use error::InspectError;
pub use headless::{HeadlessReport, StepReport, run_headless};
pub use init::{inspector_from_config, runtime_loader};
pub use inspector::{
    Action, ActionOutcome, ActionTicket, DIAGNOSTIC_SNIPPET, EMPTY_RESULT_LOG, ModelInspector,
    PendingAction, unavailable_module_explanation,
};
pub use marker::MarkerPattern;
pub use source::{FetchError, FetchFut, HttpModelSource, ModelSource};

pub use trinity_runtime::{LoadPhase, RuntimeProvider};
pub use trinity_types::{Flag, InspectionStatus, UiOptions, Verdict, VerdictInputs};
