//! UI options and presentation mode.

use std::str::FromStr;

use thiserror::Error;

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Show a static busy marker instead of an animated spinner.
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UiMode {
    /// Full-screen interactive page.
    #[default]
    Full,
    /// Run every action once and print the results.
    Headless,
}

const UI_MODE_VALUES: &[&str] = &["full", "fullscreen", "headless"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ui mode '{raw}'; expected one of: {expected:?}")]
pub struct UiModeParseError {
    raw: String,
    expected: &'static [&'static str],
}

impl FromStr for UiMode {
    type Err = UiModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "fullscreen" => Ok(UiMode::Full),
            "headless" => Ok(UiMode::Headless),
            _ => Err(UiModeParseError {
                raw: s.to_string(),
                expected: UI_MODE_VALUES,
            }),
        }
    }
}
