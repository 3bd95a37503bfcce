//! Non-interactive page run.

use std::fmt::Write as _;

use trinity_types::{InspectionStatus, Verdict};

use crate::inspector::{Action, ModelInspector};

/// What one action left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub action: Action,
    pub status: InspectionStatus,
    pub error: Option<String>,
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessReport {
    pub steps: Vec<StepReport>,
    pub verdict: Verdict,
}

impl HeadlessReport {
    #[must_use]
    pub fn final_status(&self) -> InspectionStatus {
        self.steps
            .last()
            .map_or(InspectionStatus::Idle, |step| step.status)
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.final_status() != InspectionStatus::Error
    }

    /// Plain-text rendering for stdout.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let _ = writeln!(out, "== {} [{}]", step.action.label(), step.status);
            if let Some(error) = &step.error {
                let _ = writeln!(out, "error: {error}");
            }
            // A failed step leaves the previous step's log in place.
            let produced_log = step.status == InspectionStatus::Ready;
            if step.action != Action::Initialize && produced_log && !step.log.is_empty() {
                let _ = writeln!(out, "{}", step.log);
            }
        }
        let _ = writeln!(out, "verdict: {}", self.verdict.label());
        out
    }
}

/// Initialize, run the diagnostic, then inspect the model, in that order.
pub async fn run_headless(inspector: &mut ModelInspector) -> HeadlessReport {
    let mut steps = Vec::with_capacity(3);
    for action in [Action::Initialize, Action::Diagnostic, Action::InspectModel] {
        inspector.perform(action).await;
        steps.push(StepReport {
            action,
            status: inspector.status(),
            error: inspector.error().map(str::to_string),
            log: inspector.log().to_string(),
        });
    }
    HeadlessReport {
        steps,
        verdict: inspector.verdict(),
    }
}
