//! Parsing for the "stylish" output format popularized by jshint and eslint.
//!
//! For each file with findings the tool prints the file path, followed by
//! one line per finding:
//!
//! ```text
//! <line>:<char>  <severity>  <message>  <rule>
//! ```
//!
//! Columns are padded into a table, so fields may be separated by runs of
//! whitespace. Header, blank and summary lines are skipped.

use crate::{Diagnostic, Severity};
use std::path::Path;

/// How a stylish-format tool spells severities and rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylishDialect {
    /// `error` / `warning`; the rule stays inline in the message.
    Words,
    /// `✖` / `⚠`; the last token is the rule and moves to a `[rule]` suffix.
    Glyphs,
}

impl StylishDialect {
    /// Map the second token of a line to a severity.
    pub fn severity(&self, marker: &str) -> Option<Severity> {
        match (*self, marker) {
            (Self::Words, "error") | (Self::Glyphs, "✖") => Some(Severity::Error),
            (Self::Words, "warning") | (Self::Glyphs, "⚠") => Some(Severity::Warning),
            _ => None,
        }
    }

    fn trailing_rule(&self) -> bool {
        matches!(self, Self::Glyphs)
    }
}

/// Collapse whitespace runs and split into tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse a `line:char` token. Both halves must be integers and the line positive.
pub fn parse_position(token: &str) -> Option<(usize, usize)> {
    let (line, char) = token.split_once(':')?;
    let line: usize = line.parse().ok()?;
    let char: usize = char.parse().ok()?;
    (line > 0).then_some((line, char))
}

/// Parse one output line. Returns `None` for anything that is not a finding.
pub fn parse_line(
    dialect: StylishDialect,
    code: &str,
    path: &Path,
    line: &str,
) -> Option<Diagnostic> {
    let mut tokens = tokenize(line);
    if tokens.len() < 2 {
        return None;
    }
    let severity = dialect.severity(tokens[1])?;
    let (line_no, char) = parse_position(tokens[0])?;

    let rule = if dialect.trailing_rule() && tokens.len() > 2 {
        tokens.pop()
    } else {
        None
    };
    let message = tokens[2..].join(" ");
    let description = match rule {
        Some(rule) if message.is_empty() => format!("[{rule}]"),
        Some(rule) => format!("{message} [{rule}]"),
        None => message,
    };

    Some(
        Diagnostic::new(path, line_no, severity)
            .with_char(char)
            .with_code(code)
            .with_name(code)
            .with_description(description),
    )
}

/// Parse everything a stylish-format tool printed for `path`.
pub fn parse_output(
    dialect: StylishDialect,
    code: &str,
    path: &Path,
    stdout: &str,
) -> Vec<Diagnostic> {
    stdout
        .lines()
        .filter_map(|line| parse_line(dialect, code, path, line))
        .collect()
}
