//! sass-lint adapter - SASS/SCSS linter.
//!
//! https://github.com/sasstools/sass-lint

use crate::stylish::{self, StylishDialect};
use crate::{AdapterConfig, LintOutcome, Tool, ToolError, ToolInfo, ToolOutput};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// sass-lint adapter.
pub struct SassLint {
    info: ToolInfo,
}

impl SassLint {
    pub fn new() -> Self {
        Self {
            info: ToolInfo {
                name: "sass-lint",
                code: "sass-lint",
                binary: "sass-lint",
                extensions: &["scss", "sass"],
                config_files: &[".sass-lint.yml", ".sasslintrc"],
                website: "http://sass-lang.com/",
                install: "npm install -g sass-lint",
                min_version: None,
            },
        }
    }
}

impl Default for SassLint {
    fn default() -> Self {
        Self::new()
    }
}

/// `1.13.1` or `1.13` at the start of `--version` output.
pub(crate) fn numeric_version(stdout: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(\d+\.\d+(?:\.\d+)?)\b").expect("valid regex"));
    re.captures(stdout.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl Tool for SassLint {
    fn info(&self) -> &ToolInfo {
        &self.info
    }

    fn mandatory_flags(&self, config: &AdapterConfig) -> Vec<String> {
        let mut flags: Vec<String> = ["--format=stylish", "--no-exit", "--verbose"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        if let Some(path) = &config.config_path {
            flags.push(format!("--config={path}"));
        }
        flags
    }

    fn parse_version(&self, stdout: &str) -> Option<String> {
        numeric_version(stdout)
    }

    fn parse_output(&self, path: &Path, output: &ToolOutput) -> Result<LintOutcome, ToolError> {
        Ok(LintOutcome::Diagnostics(stylish::parse_output(
            StylishDialect::Words,
            self.info.code,
            path,
            &output.stdout,
        )))
    }
}
