//! Combine a test result document with a coverage report.

use crate::coverage::{self, CoverageMap, ModuleLayout, SourceTree};
use crate::junit::{self, TestOutcome};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("test result document is empty")]
    EmptyResults,
    #[error("malformed test result document: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Parsed test outcomes plus the coverage every outcome points at.
#[derive(Debug, Clone)]
pub struct Translation {
    pub outcomes: Vec<TestOutcome>,
    pub coverage: Arc<CoverageMap>,
}

/// Parse test results and attach coverage for `requested` paths.
///
/// `coverage_xml` of `None` (coverage disabled) or an empty document gives
/// every outcome an empty coverage map.
pub fn translate(
    results_xml: &str,
    coverage_xml: Option<&str>,
    requested: &[String],
    layout: &ModuleLayout,
    tree: &dyn SourceTree,
) -> Result<Translation, TranslateError> {
    let mut outcomes = junit::parse_results(results_xml)?;

    let coverage = Arc::new(
        coverage_xml
            .map(|xml| coverage::read_coverage(xml, requested, layout, tree))
            .unwrap_or_default(),
    );
    for outcome in &mut outcomes {
        outcome.coverage = Arc::clone(&coverage);
    }

    Ok(Translation { outcomes, coverage })
}
