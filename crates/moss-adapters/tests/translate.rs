//! Integration tests for test result + coverage translation against a real tree.

use moss_adapters::{DiskTree, ModuleLayout, TestStatus, TranslateError, translate};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const JUNIT: &str = include_str!("../fixtures/pytest/junit.xml");
const COVERAGE: &str = include_str!("../fixtures/pytest/coverage.xml");

fn write(root: &Path, path: &str, lines: usize) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    let body: String = (1..=lines).map(|n| format!("line_{n} = {n}\n")).collect();
    fs::write(full, body).unwrap();
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "webapp/__init__.py", 3);
    write(dir.path(), "webapp/views.py", 8);
    write(dir.path(), "webapp/util.py", 3);
    dir
}

#[test]
fn test_translate_fixture() {
    let dir = project();
    let requested = vec![
        "webapp/__init__.py".to_string(),
        "webapp/views.py".to_string(),
        "webapp/generated.py".to_string(),
    ];
    let translation = translate(
        JUNIT,
        Some(COVERAGE),
        &requested,
        &ModuleLayout::python(),
        &DiskTree::new(dir.path()),
    )
    .unwrap();

    let coverage = &translation.coverage;
    assert_eq!(coverage.len(), 2);
    assert_eq!(coverage["webapp/__init__.py"], "CNN");
    assert_eq!(coverage["webapp/views.py"], "CCNCUNUN");
    // Resolved but not requested.
    assert!(!coverage.contains_key("webapp/util.py"));

    let outcomes = &translation.outcomes;
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].name, "tests.test_web.test_index");
    assert_eq!(outcomes[1].status, TestStatus::Fail);
    assert!(
        outcomes[1]
            .message
            .as_deref()
            .unwrap()
            .starts_with("AssertionError: assert 302 == 200\ntests/test_web.py:18")
    );
    assert!(outcomes.iter().all(|o| Arc::ptr_eq(&o.coverage, coverage)));
}

#[test]
fn test_annotation_length_matches_file() {
    let dir = project();
    let requested = vec!["webapp/views.py".to_string(), "webapp/util.py".to_string()];
    let translation = translate(
        JUNIT,
        Some(COVERAGE),
        &requested,
        &ModuleLayout::python(),
        &DiskTree::new(dir.path()),
    )
    .unwrap();

    for (path, annotation) in translation.coverage.iter() {
        let contents = fs::read_to_string(dir.path().join(path)).unwrap();
        assert_eq!(annotation.len(), contents.lines().count(), "{path}");
    }
    assert_eq!(translation.coverage["webapp/util.py"], "NCC");
}

#[test]
fn test_without_coverage() {
    let dir = project();
    let tree = DiskTree::new(dir.path());
    let layout = ModuleLayout::python();

    let disabled = translate(JUNIT, None, &[], &layout, &tree).unwrap();
    assert!(disabled.coverage.is_empty());
    assert_eq!(disabled.outcomes.len(), 3);

    let empty = translate(JUNIT, Some(""), &[], &layout, &tree).unwrap();
    assert!(empty.coverage.is_empty());
    assert!(empty.outcomes.iter().all(|o| o.coverage.is_empty()));
}

#[test]
fn test_empty_results_document() {
    let dir = project();
    let err = translate(
        "",
        Some(COVERAGE),
        &[],
        &ModuleLayout::python(),
        &DiskTree::new(dir.path()),
    )
    .unwrap_err();
    assert!(matches!(err, TranslateError::EmptyResults));
}
