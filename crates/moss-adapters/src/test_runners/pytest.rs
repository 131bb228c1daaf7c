//! pytest runner with line coverage.
//!
//! With coverage enabled the suite runs through a wrapper script, which
//! runs a command under coverage measurement and exports the XML report:
//!
//! ```text
//! <wrapper> run -m pytest --junit-xml=junit.xml
//! <wrapper> xml -o coverage.xml
//! ```

use super::{TestReport, TestRunError, TestRunner, TestRunnerInfo};
use crate::coverage::{DiskTree, ModuleLayout};
use crate::{TestsConfig, ToolOutput, has_config_file, translate};
use std::path::{Path, PathBuf};
use std::process::Command;

const JUNIT_FILE: &str = "junit.xml";
const COVERAGE_FILE: &str = "coverage.xml";

/// Report files written into the project root, removed when dropped.
struct ReportFiles {
    paths: Vec<PathBuf>,
}

impl Drop for ReportFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), "failed to remove report: {e}");
                }
            }
        }
    }
}

/// pytest runner.
pub struct Pytest {
    config: TestsConfig,
    layout: ModuleLayout,
}

impl Pytest {
    pub fn new(config: TestsConfig) -> Self {
        Self {
            config,
            layout: ModuleLayout::python(),
        }
    }

    /// Command line that runs the suite and writes the result document.
    pub fn test_command(&self) -> Vec<String> {
        let pytest = ["pytest".to_string(), format!("--junit-xml={JUNIT_FILE}")];
        if self.config.coverage {
            let mut cmd = vec![
                self.config.wrapper.to_string_lossy().into_owned(),
                "run".to_string(),
                "-m".to_string(),
            ];
            cmd.extend(pytest);
            cmd
        } else {
            pytest.to_vec()
        }
    }

    /// Command line that exports the coverage document.
    pub fn coverage_command(&self) -> Vec<String> {
        vec![
            self.config.wrapper.to_string_lossy().into_owned(),
            "xml".to_string(),
            "-o".to_string(),
            COVERAGE_FILE.to_string(),
        ]
    }
}

impl Default for Pytest {
    fn default() -> Self {
        Self::new(TestsConfig::default())
    }
}

fn execute(cmd: &[String], root: &Path) -> Result<ToolOutput, TestRunError> {
    let (program, args) = cmd
        .split_first()
        .ok_or_else(|| TestRunError::NotAvailable("empty command".to_string()))?;
    // Scripts like ./bin/coverage-wrapper.sh are relative to the project root.
    let program = if program.contains('/') {
        root.join(program)
    } else {
        PathBuf::from(program)
    };
    tracing::info!(command = %cmd.join(" "), root = %root.display(), "running");
    Ok(Command::new(program)
        .args(args)
        .current_dir(root)
        .output()?
        .into())
}

impl TestRunner for Pytest {
    fn info(&self) -> TestRunnerInfo {
        TestRunnerInfo {
            name: "pytest",
            description: "Python tests via pytest, with optional line coverage",
        }
    }

    fn is_available(&self, root: &Path) -> bool {
        if self.config.coverage {
            root.join(&self.config.wrapper).is_file()
        } else {
            which::which("pytest").is_ok()
        }
    }

    fn detect(&self, root: &Path) -> f32 {
        if has_config_file(root, &["pytest.ini", "conftest.py"]) {
            1.0
        } else if has_config_file(root, &["pyproject.toml", "setup.cfg", "tox.ini"]) {
            0.5
        } else {
            0.0
        }
    }

    fn run(&self, root: &Path, paths: &[String]) -> Result<TestReport, TestRunError> {
        if !self.is_available(root) {
            return Err(TestRunError::NotAvailable(self.test_command().join(" ")));
        }

        let junit_path = root.join(JUNIT_FILE);
        let coverage_path = root.join(COVERAGE_FILE);
        let _cleanup = ReportFiles {
            paths: vec![junit_path.clone(), coverage_path.clone()],
        };

        let command = self.test_command();
        let output = execute(&command, root)?;
        if !junit_path.is_file() {
            return Err(TestRunError::CommandFailed {
                command: command.join(" "),
                expected: JUNIT_FILE.to_string(),
                output,
            });
        }

        let coverage_xml = if self.config.coverage {
            let export = self.coverage_command();
            let export_output = execute(&export, root)?;
            if export_output.failed() {
                return Err(TestRunError::CommandFailed {
                    command: export.join(" "),
                    expected: COVERAGE_FILE.to_string(),
                    output: export_output,
                });
            }
            if coverage_path.is_file() {
                Some(std::fs::read_to_string(&coverage_path)?)
            } else {
                tracing::warn!(
                    path = %coverage_path.display(),
                    "coverage export wrote no report, continuing without coverage"
                );
                Some(String::new())
            }
        } else {
            None
        };

        let results_xml = std::fs::read_to_string(&junit_path)?;
        let translation = translate(
            &results_xml,
            coverage_xml.as_deref(),
            paths,
            &self.layout,
            &DiskTree::new(root),
        )?;

        Ok(TestReport {
            runner: self.info().name.to_string(),
            status: output.status,
            outcomes: translation.outcomes,
            coverage: translation.coverage,
        })
    }
}
