//! stylelint adapter - CSS/SCSS linter.
//!
//! stylelint's default formatter marks severities with `✖`/`⚠` and ends
//! each line with the rule name.
//! https://stylelint.io/

use super::sass_lint::numeric_version;
use crate::stylish::{self, StylishDialect};
use crate::{AdapterConfig, LintOutcome, Tool, ToolError, ToolInfo, ToolOutput};
use std::path::Path;

/// stylelint adapter.
pub struct Stylelint {
    info: ToolInfo,
}

impl Stylelint {
    pub fn new() -> Self {
        Self {
            info: ToolInfo {
                name: "stylelint",
                code: "stylelint",
                binary: "stylelint",
                extensions: &["css", "scss"],
                config_files: &[
                    ".stylelintrc",
                    ".stylelintrc.json",
                    ".stylelintrc.yml",
                    ".stylelintrc.yaml",
                    ".stylelintrc.js",
                    "stylelint.config.js",
                ],
                website: "https://stylelint.io/",
                install: "npm install -g stylelint",
                min_version: None,
            },
        }
    }
}

impl Default for Stylelint {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for Stylelint {
    fn info(&self) -> &ToolInfo {
        &self.info
    }

    fn mandatory_flags(&self, config: &AdapterConfig) -> Vec<String> {
        let mut flags = vec!["--no-color".to_string()];
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
            StylishDialect::Glyphs,
            self.info.code,
            path,
            &output.stdout,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn test_parse_output() {
        let stdout = "\
src/site.css
 3:5   ✖  Unexpected unknown property \"colr\"   property-no-unknown
 9:1   ⚠  Expected empty line before rule       rule-empty-line-before

2 problems (1 error, 1 warning)
";
        let outcome = Stylelint::new()
            .parse_output(Path::new("src/site.css"), &ToolOutput::new(2, stdout, ""))
            .unwrap();
        let diags = outcome.diagnostics();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(
            diags[0].description,
            "Unexpected unknown property \"colr\" [property-no-unknown]"
        );
        assert_eq!((diags[1].line, diags[1].char), (9, Some(1)));
        assert_eq!(
            diags[1].description,
            "Expected empty line before rule [rule-empty-line-before]"
        );
    }

    #[test]
    fn test_mandatory_flags() {
        let config = AdapterConfig::default().with_config_path(".stylelintrc.json");
        assert_eq!(
            Stylelint::new().mandatory_flags(&config),
            vec!["--no-color", "--config=.stylelintrc.json"]
        );
    }
}
