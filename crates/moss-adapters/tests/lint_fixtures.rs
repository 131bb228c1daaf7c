//! Integration tests using captured output from the lint tools.

use moss_adapters::adapters::{Eslint, SassLint, ScssLint, Stylelint};
use moss_adapters::{Diagnostic, LintOutcome, Severity, Tool, ToolError, ToolOutput};
use std::path::Path;

const ESLINT_STYLISH: &str = include_str!("../fixtures/eslint/stylish.txt");
const STYLELINT_DEFAULT: &str = include_str!("../fixtures/stylelint/default.txt");
const SASS_LINT_STYLISH: &str = include_str!("../fixtures/sass-lint/stylish.txt");
const SCSS_LINT_WARNINGS: &str = include_str!("../fixtures/scss-lint/warnings.txt");
const SCSS_LINT_SYNTAX_ERROR: &str = include_str!("../fixtures/scss-lint/syntax_error.txt");

fn render(diags: &[Diagnostic]) -> String {
    diags
        .iter()
        .map(|d| {
            let position = match d.char {
                Some(c) => format!("{}:{}", d.line, c),
                None => d.line.to_string(),
            };
            format!(
                "{} {} {} {}",
                position,
                d.severity.as_str(),
                d.name,
                d.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn diagnostics(tool: &dyn Tool, path: &str, output: &ToolOutput) -> Vec<Diagnostic> {
    match tool.parse_output(Path::new(path), output).expect("should parse") {
        LintOutcome::Diagnostics(diags) => diags,
        LintOutcome::Unavailable { status } => panic!("unexpected unavailable ({status:?})"),
    }
}

#[test]
fn test_eslint_stylish() {
    let output = ToolOutput::new(1, ESLINT_STYLISH, "");
    let diags = diagnostics(&Eslint::new(), "src/app.js", &output);

    insta::assert_snapshot!(render(&diags), @r"
    1:10 error ESLINT 'React' is defined but never used no-unused-vars
    12:5 warning ESLINT Unexpected console statement no-console
    40:22 error ESLINT Missing semicolon semi
    ");
    assert!(diags.iter().all(|d| d.path == Path::new("src/app.js")));
    assert!(diags.iter().all(|d| d.code == "ESLINT"));
}

#[test]
fn test_stylelint_rules_become_suffixes() {
    let output = ToolOutput::new(2, STYLELINT_DEFAULT, "");
    let diags = diagnostics(&Stylelint::new(), "styles/site.css", &output);

    insta::assert_snapshot!(render(&diags), @r#"
    3:5 error stylelint Unexpected unknown property "colr" [property-no-unknown]
    14:1 warning stylelint Expected empty line before rule [rule-empty-line-before]
    22:12 error stylelint Unexpected duplicate selector ".nav", first used at line 9 [no-duplicate-selectors]
    "#);
}

#[test]
fn test_sass_lint_stylish() {
    let output = ToolOutput::new(0, SASS_LINT_STYLISH, "");
    let diags = diagnostics(&SassLint::new(), "styles/_buttons.scss", &output);

    assert_eq!(diags.len(), 3);
    assert_eq!(diags[1].severity, Severity::Error);
    assert_eq!((diags[2].line, diags[2].char), (17, Some(14)));
    assert_eq!(
        diags[2].description,
        "Expected `#fff` instead of `#FFF` hex-notation"
    );
}

#[test]
fn test_scss_lint_warnings() {
    let output = ToolOutput::new(1, SCSS_LINT_WARNINGS, "");
    let diags = diagnostics(&ScssLint::new(), "app.scss", &output);

    assert_eq!(diags.len(), 3);
    let names: Vec<_> = diags.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Shorthand", "ColorVariable", "SelectorDepth"]);
    assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    assert!(diags.iter().all(|d| d.code == "SCSS-LINT1"));
    assert!(diags[1].description.starts_with("Color literals like `#333`"));
}

#[test]
fn test_scss_lint_syntax_error() {
    let output = ToolOutput::new(2, SCSS_LINT_SYNTAX_ERROR, "");
    let diags = diagnostics(&ScssLint::new(), "app.scss", &output);

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[0].name, "Syntax Error");
    assert_eq!(
        diags[0].description,
        r#"Invalid CSS after "  color: red": expected "{", was ";""#
    );
}

#[test]
fn test_scss_lint_crash_is_not_clean() {
    let crashed = ToolOutput::new(70, "", "undefined method `each' for nil:NilClass");
    let outcome = ScssLint::new()
        .parse_output(Path::new("app.scss"), &crashed)
        .unwrap();
    assert!(outcome.is_unavailable());

    let clean = ToolOutput::new(0, "", "");
    let outcome = ScssLint::new()
        .parse_output(Path::new("app.scss"), &clean)
        .unwrap();
    assert_eq!(outcome, LintOutcome::Diagnostics(Vec::new()));
}

#[test]
fn test_scss_lint_drifted_warning_format() {
    let output = ToolOutput::new(1, "app.scss:12 [W] Shorthand form should be shorter\n", "");
    let err = ScssLint::new()
        .parse_output(Path::new("app.scss"), &output)
        .unwrap_err();
    match err {
        ToolError::MalformedOutput { tool, line } => {
            assert_eq!(tool, "scss-lint");
            assert_eq!(line, "app.scss:12 [W] Shorthand form should be shorter");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parsing_is_idempotent() {
    let tools: Vec<(Box<dyn Tool>, &str)> = vec![
        (Box::new(Eslint::new()), ESLINT_STYLISH),
        (Box::new(Stylelint::new()), STYLELINT_DEFAULT),
        (Box::new(SassLint::new()), SASS_LINT_STYLISH),
        (Box::new(ScssLint::new()), SCSS_LINT_WARNINGS),
    ];
    for (tool, stdout) in &tools {
        let output = ToolOutput::new(1, *stdout, "");
        let first = diagnostics(tool.as_ref(), "f", &output);
        let second = diagnostics(tool.as_ref(), "f", &output);
        assert!(!first.is_empty());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
