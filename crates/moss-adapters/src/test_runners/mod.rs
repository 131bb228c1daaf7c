//! Test runner adapters.
//!
//! A runner executes a project's tests, then translates the result and
//! coverage documents the run left behind into [`TestOutcome`]s.

mod pytest;

pub use pytest::Pytest;

use crate::coverage::CoverageMap;
use crate::junit::TestOutcome;
use crate::{TestsConfig, ToolOutput, TranslateError};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Information about a test runner.
#[derive(Debug, Clone)]
pub struct TestRunnerInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Result of running tests.
#[derive(Debug, Clone)]
pub struct TestReport {
    pub runner: String,
    /// Exit status of the test command.
    pub status: Option<i32>,
    pub outcomes: Vec<TestOutcome>,
    pub coverage: Arc<CoverageMap>,
}

impl TestReport {
    /// No test failed or broke.
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|o| {
            matches!(
                o.status,
                crate::TestStatus::Pass | crate::TestStatus::Skip
            )
        })
    }
}

#[derive(Debug, Error)]
pub enum TestRunError {
    #[error("test runner not available: {0}")]
    NotAvailable(String),
    #[error("`{command}` failed without producing {expected}")]
    CommandFailed {
        command: String,
        expected: String,
        output: ToolOutput,
    },
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A test runner that can detect and run tests for a project type.
pub trait TestRunner: Send + Sync {
    /// Info about this test runner.
    fn info(&self) -> TestRunnerInfo;

    /// Check if this test runner can run in `root`.
    fn is_available(&self, root: &Path) -> bool;

    /// Detect if this runner applies to the project. Returns confidence 0.0-1.0.
    fn detect(&self, root: &Path) -> f32;

    /// Run the tests. Coverage is kept for `paths` (relative to `root`) only.
    fn run(&self, root: &Path, paths: &[String]) -> Result<TestReport, TestRunError>;
}

/// All built-in test runners.
pub fn all_test_runners(config: &TestsConfig) -> Vec<Box<dyn TestRunner>> {
    vec![Box::new(Pytest::new(config.clone()))]
}

/// Find the best available runner for a project.
pub fn detect_test_runner<'a>(
    runners: &'a [Box<dyn TestRunner>],
    root: &Path,
) -> Option<&'a dyn TestRunner> {
    runners
        .iter()
        .filter(|r| r.is_available(root))
        .map(|r| (r.as_ref(), r.detect(root)))
        .filter(|(_, score)| *score > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(runner, _)| runner)
}
