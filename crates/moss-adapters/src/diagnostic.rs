//! Diagnostic record shared by every lint adapter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity levels for diagnostics.
///
/// Tools report many levels; adapters fold them onto these two or drop the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must be fixed.
    Error,
    /// Should be fixed.
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A single normalized finding from a lint tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the diagnostic applies to.
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// Column, when the tool reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char: Option<usize>,
    pub severity: Severity,
    /// Stable category identifier (linter code or tool-assigned code).
    pub code: String,
    /// Short label.
    pub name: String,
    /// Full human-readable message.
    pub description: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<PathBuf>, line: usize, severity: Severity) -> Self {
        Self {
            path: path.into(),
            line,
            char: None,
            severity,
            code: String::new(),
            name: String::new(),
            description: String::new(),
        }
    }

    pub fn error(path: impl Into<PathBuf>, line: usize) -> Self {
        Self::new(path, line, Severity::Error)
    }

    pub fn warning(path: impl Into<PathBuf>, line: usize) -> Self {
        Self::new(path, line, Severity::Warning)
    }

    pub fn with_char(mut self, char: usize) -> Self {
        self.char = Some(char);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
