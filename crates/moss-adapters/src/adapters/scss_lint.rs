//! scss-lint adapter - SCSS linter.
//!
//! scss-lint prints one finding per line:
//!
//! ```text
//! app.scss:12 [W] Shorthand: Prefer `margin: 0` over `margin: 0 0`
//! app.scss:3 [E] Syntax Error: Invalid CSS after "a {"
//! ```
//!
//! Warnings carry a `Name: description` message. Errors are named after the
//! process exit status. A failing run with no parseable line means the
//! results are unavailable, which is not the same as a clean run.
//! https://github.com/sds/scss-lint

use crate::{
    AdapterConfig, Diagnostic, LintOutcome, Severity, Tool, ToolError, ToolInfo, ToolOutput,
};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Exit status to lint name, in exit-status order.
pub const EXIT_CODE_NAMES: &[(i32, &str)] = &[
    (1, "Warning"),
    (2, "Syntax Error"),
    (64, "Usage Error"),
    (66, "File Error"),
    (70, "Unexpected Error"),
    (78, "Configuration Error"),
];

/// Name used when the exit status is not in [`EXIT_CODE_NAMES`].
pub const UNKNOWN_NAME: &str = "Unknown lint message";

/// Look up the lint name for a process exit status.
pub fn exit_code_name(status: Option<i32>) -> &'static str {
    status
        .and_then(|s| EXIT_CODE_NAMES.iter().find(|(code, _)| *code == s))
        .map_or(UNKNOWN_NAME, |(_, name)| *name)
}

fn line_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<path>[\w/.]+):(?P<line>\d+) \[(?P<level>[EW])\] (?P<description>.+)$")
            .expect("valid regex")
    })
}

fn severity_for_level(level: &str) -> Severity {
    match level {
        "E" => Severity::Error,
        "W" => Severity::Warning,
        other => unreachable!("line pattern only admits E and W, got {other:?}"),
    }
}

/// scss-lint adapter.
pub struct ScssLint {
    info: ToolInfo,
}

impl ScssLint {
    pub fn new() -> Self {
        Self {
            info: ToolInfo {
                name: "scss-lint",
                code: "SCSS-LINT",
                binary: "scss-lint",
                extensions: &["scss"],
                config_files: &[".scss-lint.yml"],
                website: "http://sass-lang.com/",
                install: "gem install scss-lint",
                min_version: None,
            },
        }
    }

    /// Parse one line; `Ok(None)` when the line is not a finding.
    fn parse_line(&self, line: &str, status: Option<i32>) -> Result<Option<Diagnostic>, ToolError> {
        let Some(caps) = line_pattern().captures(line) else {
            return Ok(None);
        };
        let Ok(line_no) = caps["line"].parse::<usize>() else {
            return Ok(None);
        };
        if line_no == 0 {
            return Ok(None);
        }

        let severity = severity_for_level(&caps["level"]);
        let message = &caps["description"];
        let (name, description) = match severity {
            Severity::Warning => message.split_once(": ").ok_or_else(|| {
                ToolError::MalformedOutput {
                    tool: self.info.name.to_string(),
                    line: line.to_string(),
                }
            })?,
            Severity::Error => (exit_code_name(status), message),
        };

        let code = match status {
            Some(s) => format!("{}{s}", self.info.code),
            None => self.info.code.to_string(),
        };

        Ok(Some(
            Diagnostic::new(&caps["path"], line_no, severity)
                .with_code(code)
                .with_name(name)
                .with_description(description),
        ))
    }
}

impl Default for ScssLint {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ScssLint {
    fn info(&self) -> &ToolInfo {
        &self.info
    }

    fn mandatory_flags(&self, config: &AdapterConfig) -> Vec<String> {
        config
            .config_path
            .iter()
            .map(|path| format!("--config={path}"))
            .collect()
    }

    fn parse_version(&self, stdout: &str) -> Option<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^scss-lint (?P<version>\d+\.\d+\.\d+)\b").expect("valid regex")
        });
        re.captures(stdout.trim_start())
            .map(|caps| caps["version"].to_string())
    }

    fn parse_output(&self, _path: &Path, output: &ToolOutput) -> Result<LintOutcome, ToolError> {
        let mut diagnostics = Vec::new();
        for line in output.stdout.lines() {
            if let Some(diag) = self.parse_line(line, output.status)? {
                diagnostics.push(diag);
            }
        }

        if output.failed() && diagnostics.is_empty() {
            return Ok(LintOutcome::Unavailable {
                status: output.status,
            });
        }
        Ok(LintOutcome::Diagnostics(diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(status: i32, stdout: &str) -> Result<LintOutcome, ToolError> {
        ScssLint::new().parse_output(Path::new("app.scss"), &ToolOutput::new(status, stdout, ""))
    }

    #[test]
    fn test_warning_splits_name() {
        let outcome = parse(1, "app.scss:12 [W] Prefer shorthand: use `margin` instead\n").unwrap();
        let diags = outcome.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].name, "Prefer shorthand");
        assert_eq!(diags[0].description, "use `margin` instead");
        assert_eq!(diags[0].line, 12);
        assert_eq!(diags[0].char, None);
        assert_eq!(diags[0].code, "SCSS-LINT1");
    }

    #[test]
    fn test_warning_keeps_later_delimiters() {
        let outcome = parse(1, "a.scss:1 [W] Name: first: second").unwrap();
        assert_eq!(outcome.diagnostics()[0].description, "first: second");
    }

    #[test]
    fn test_error_named_by_exit_status() {
        let outcome = parse(2, "styles/main.scss:3 [E] Invalid CSS after \"a {\"").unwrap();
        let diag = &outcome.diagnostics()[0];
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.name, "Syntax Error");
        assert_eq!(diag.description, "Invalid CSS after \"a {\"");
        assert_eq!(diag.path, Path::new("styles/main.scss"));
        assert_eq!(diag.code, "SCSS-LINT2");
    }

    #[test]
    fn test_warning_without_delimiter_is_malformed() {
        let err = parse(1, "app.scss:4 [W] no delimiter here").unwrap_err();
        assert!(matches!(err, ToolError::MalformedOutput { .. }));
    }

    #[test]
    fn test_failure_without_output_is_unavailable() {
        let outcome = parse(66, "Error: No SCSS files matched by the patterns\n").unwrap();
        assert_eq!(outcome, LintOutcome::Unavailable { status: Some(66) });
    }

    #[test]
    fn test_clean_run_is_empty() {
        let outcome = parse(0, "").unwrap();
        assert_eq!(outcome, LintOutcome::Diagnostics(Vec::new()));
    }

    #[test]
    fn test_non_matching_lines_ignored() {
        let outcome = parse(
            1,
            "Running scss-lint\napp.scss:7 [W] Indentation: Line should be indented 2 spaces\napp.scss [W] missing line\n",
        )
        .unwrap();
        assert_eq!(outcome.diagnostics().len(), 1);
    }

    #[test]
    fn test_exit_code_name() {
        assert_eq!(exit_code_name(Some(78)), "Configuration Error");
        assert_eq!(exit_code_name(Some(70)), "Unexpected Error");
        assert_eq!(exit_code_name(Some(3)), UNKNOWN_NAME);
        assert_eq!(exit_code_name(None), UNKNOWN_NAME);
    }

    #[test]
    fn test_parse_version() {
        let lint = ScssLint::new();
        assert_eq!(lint.parse_version("scss-lint 0.59.0\n"), Some("0.59.0".to_string()));
        assert_eq!(lint.parse_version("0.59.0"), None);
    }
}
