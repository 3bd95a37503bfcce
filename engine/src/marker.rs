//! Textual import detection.
//!
//! This is a heuristic, not a parse: it looks for `import <module>` or
//! `from <module> import` anywhere in the text, including inside comments and
//! strings. Models that import the module in any other way (`import os, z3`,
//! `__import__("z3")`) are not detected.

use regex::Regex;

/// Detects whether source text imports one specific module.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    module: String,
    regex: Regex,
}

impl MarkerPattern {
    pub fn for_module(module: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(module);
        let regex = Regex::new(&format!(
            r"\bimport\s+{escaped}\b|from\s+{escaped}\s+import\b"
        ))?;
        Ok(Self {
            module: module.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn is_match(&self, source: &str) -> bool {
        self.regex.is_match(source)
    }
}
