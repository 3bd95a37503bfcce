//! Core domain types for the Trinity model page.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod sanitize;
mod status;
mod ui;
mod verdict;

pub use sanitize::sanitize_terminal_text;
pub use status::InspectionStatus;
pub use ui::{UiMode, UiModeParseError, UiOptions};
pub use verdict::{Flag, Verdict, VerdictInputs};
