//! Tool trait and common types.

use crate::{AdapterConfig, Diagnostic, Severity};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;

/// Information about a tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Adapter name (e.g., "eslint", "scss-lint").
    pub name: &'static str,
    /// Linter code stamped on every diagnostic (e.g., "ESLINT").
    pub code: &'static str,
    /// Binary invoked by default.
    pub binary: &'static str,
    /// File extensions this tool handles.
    pub extensions: &'static [&'static str],
    /// Config files whose presence marks the tool as relevant.
    pub config_files: &'static [&'static str],
    /// URL to tool website.
    pub website: &'static str,
    /// How to install the tool.
    pub install: &'static str,
    /// Oldest supported version, if the adapter depends on one.
    pub min_version: Option<&'static str>,
}

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit status; `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn new(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with anything other than 0.
    pub fn failed(&self) -> bool {
        self.status != Some(0)
    }
}

impl From<Output> for ToolOutput {
    fn from(output: Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// What a parser made of a tool's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    /// Parsed diagnostics; empty means a clean run.
    Diagnostics(Vec<Diagnostic>),
    /// The tool failed and nothing it printed could be parsed.
    Unavailable { status: Option<i32> },
}

impl LintOutcome {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Diagnostics(diags) => diags,
            Self::Unavailable { .. } => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Result of running a tool on one path.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Tool that produced this result.
    pub tool: String,
    /// Path the tool was run on.
    pub path: PathBuf,
    /// Diagnostics found.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the tool produced usable results.
    pub success: bool,
    /// Optional error message if tool failed.
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(tool: &str, path: &Path, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            tool: tool.to_string(),
            path: path.to_path_buf(),
            diagnostics,
            success: true,
            error: None,
        }
    }

    pub fn failure(tool: &str, path: &Path, error: impl ToString) -> Self {
        Self {
            tool: tool.to_string(),
            path: path.to_path_buf(),
            diagnostics: Vec::new(),
            success: false,
            error: Some(error.to_string()),
        }
    }

    pub fn from_outcome(tool: &str, path: &Path, outcome: LintOutcome) -> Self {
        match outcome {
            LintOutcome::Diagnostics(diags) => Self::success(tool, path, diags),
            LintOutcome::Unavailable { status } => {
                let status = status.map_or_else(|| "signal".to_string(), |s| s.to_string());
                Self::failure(
                    tool,
                    path,
                    format!("{tool} exited with status {status} and produced no parseable output"),
                )
            }
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Error type for tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
    #[error("{tool} {found} is older than the required {required}")]
    UnsupportedVersion {
        tool: String,
        found: String,
        required: String,
    },
    #[error("{tool} output does not match the expected format: {line}")]
    MalformedOutput { tool: String, line: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for lint adapters.
///
/// Each tool (eslint, stylelint, scss-lint, ...) implements this trait. Only
/// [`Tool::parse_output`] looks at what the tool printed; the rest is process glue.
pub trait Tool: Send + Sync {
    /// Get tool information.
    fn info(&self) -> &ToolInfo;

    /// Flags always passed to the binary, derived from the adapter config.
    fn mandatory_flags(&self, config: &AdapterConfig) -> Vec<String>;

    /// Extract the version from `<binary> --version` output.
    fn parse_version(&self, stdout: &str) -> Option<String>;

    /// Translate captured output for `path` into diagnostics.
    fn parse_output(&self, path: &Path, output: &ToolOutput) -> Result<LintOutcome, ToolError>;

    /// Check if the tool is available on the system.
    fn is_available(&self) -> bool {
        which::which(self.info().binary).is_ok()
    }

    /// Get the tool version, if available.
    fn version(&self) -> Option<String> {
        Command::new(self.info().binary)
            .arg("--version")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|s| self.parse_version(&s))
    }

    /// Fail if the installed version is older than the adapter supports.
    fn check_version(&self) -> Result<(), ToolError> {
        let info = self.info();
        let (Some(required), Some(found)) = (info.min_version, self.version()) else {
            return Ok(());
        };
        if meets_minimum(&found, required) {
            Ok(())
        } else {
            Err(ToolError::UnsupportedVersion {
                tool: info.name.to_string(),
                found,
                required: required.to_string(),
            })
        }
    }

    /// Detect if this tool is relevant for the given project.
    ///
    /// Returns a confidence score (0.0 = not relevant, 1.0 = definitely relevant).
    fn detect(&self, root: &Path) -> f32 {
        if has_config_file(root, self.info().config_files) {
            1.0
        } else {
            0.0
        }
    }

    /// Whether `path` has an extension this tool lints.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.info().extensions.contains(&ext))
    }

    /// Run the tool on one file.
    ///
    /// # Arguments
    /// * `path` - File to check, relative to `root`.
    /// * `root` - Working directory for the tool.
    /// * `config` - Adapter settings.
    fn run(&self, path: &Path, root: &Path, config: &AdapterConfig) -> Result<ToolResult, ToolError> {
        let info = self.info();
        let binary = which::which(info.binary)
            .map_err(|_| ToolError::NotFound(format!("{} ({})", info.binary, info.install)))?;

        let flags = self.mandatory_flags(config);
        tracing::debug!(tool = info.name, path = %path.display(), ?flags, "running linter");

        let output: ToolOutput = Command::new(binary)
            .args(&flags)
            .arg(path)
            .current_dir(root)
            .output()?
            .into();

        let outcome = self.parse_output(path, &output)?;
        Ok(ToolResult::from_outcome(info.name, path, outcome))
    }
}

/// Helper to check if a config file exists.
pub fn has_config_file(root: &Path, names: &[&str]) -> bool {
    names.iter().any(|name| root.join(name).exists())
}

/// Compare dotted numeric versions, ignoring a leading `v` and any
/// non-numeric suffix on a component.
pub fn meets_minimum(version: &str, minimum: &str) -> bool {
    fn components(v: &str) -> Vec<u64> {
        v.trim()
            .trim_start_matches('v')
            .split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse().unwrap_or(0)
            })
            .collect()
    }

    let found = components(version);
    let required = components(minimum);
    let len = found.len().max(required.len());
    for i in 0..len {
        let a = found.get(i).copied().unwrap_or(0);
        let b = required.get(i).copied().unwrap_or(0);
        if a != b {
            return a > b;
        }
    }
    true
}
