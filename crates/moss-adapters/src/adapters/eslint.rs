//! ESLint adapter - JavaScript linter.
//!
//! Runs `eslint_d` with the stylish formatter.
//! https://eslint.org/

use crate::stylish::{self, StylishDialect};
use crate::{AdapterConfig, LintOutcome, Tool, ToolError, ToolInfo, ToolOutput};
use std::path::Path;

/// ESLint JavaScript linter adapter.
pub struct Eslint {
    info: ToolInfo,
}

impl Eslint {
    pub fn new() -> Self {
        Self {
            info: ToolInfo {
                name: "eslint",
                code: "ESLINT",
                binary: "eslint_d",
                extensions: &["js", "jsx", "mjs", "cjs"],
                config_files: &[
                    ".eslintrc",
                    ".eslintrc.js",
                    ".eslintrc.cjs",
                    ".eslintrc.json",
                    ".eslintrc.yml",
                    ".eslintrc.yaml",
                    "eslint.config.js",
                    "eslint.config.mjs",
                ],
                website: "https://www.eslint.org",
                install: "npm install -g eslint",
                min_version: Some("v1.0.0"),
            },
        }
    }
}

impl Default for Eslint {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for Eslint {
    fn info(&self) -> &ToolInfo {
        &self.info
    }

    fn mandatory_flags(&self, config: &AdapterConfig) -> Vec<String> {
        let mut flags = vec!["--format=stylish".to_string()];
        if let Some(env) = &config.env {
            flags.push(format!("--env={env}"));
        }
        if let Some(path) = &config.config_path {
            flags.push(format!("--config={path}"));
        }
        flags
    }

    fn parse_version(&self, stdout: &str) -> Option<String> {
        let version = stdout.lines().next()?.trim();
        if version.is_empty() || version.contains("command not found") {
            return None;
        }
        Some(version.to_string())
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
