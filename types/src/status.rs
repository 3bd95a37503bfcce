//! Inspection status shown on the model page.

use std::fmt;

/// Drives which affordances are enabled.
///
/// `Loading` is the automatic initial acquisition when the page mounts,
/// `Running` covers user-triggered actions. Both disable the action controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InspectionStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Running,
    Error,
}

impl InspectionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InspectionStatus::Idle => "idle",
            InspectionStatus::Loading => "loading",
            InspectionStatus::Ready => "ready",
            InspectionStatus::Running => "running",
            InspectionStatus::Error => "error",
        }
    }

    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, InspectionStatus::Loading | InspectionStatus::Running)
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
