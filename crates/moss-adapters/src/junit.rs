//! JUnit/xUnit test result documents.

use crate::TranslateError;
use crate::coverage::CoverageMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;
use std::sync::Arc;

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    /// The test errored rather than failing an assertion.
    Broken,
    Skip,
}

/// One test case from a result document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    /// `classname.name`, or just `name` when there is no class.
    pub name: String,
    pub status: TestStatus,
    /// Run time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Failure/error message and details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Coverage for the whole run; shared by every outcome of the run.
    pub coverage: Arc<CoverageMap>,
}

impl TestOutcome {
    pub fn new(name: impl Into<String>, status: TestStatus) -> Self {
        Self {
            name: name.into(),
            status,
            duration: None,
            message: None,
            coverage: Arc::default(),
        }
    }

    fn append_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match &mut self.message {
            Some(message) => {
                message.push('\n');
                message.push_str(text);
            }
            None => self.message = Some(text.to_string()),
        }
    }
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, quick_xml::Error> {
    match e.try_get_attribute(name)? {
        Some(a) => Ok(Some(a.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn start_case(e: &BytesStart<'_>) -> Result<TestOutcome, quick_xml::Error> {
    let name = attr(e, "name")?.unwrap_or_default();
    let name = match attr(e, "classname")? {
        Some(class) if !class.is_empty() => format!("{class}.{name}"),
        _ => name,
    };
    let mut outcome = TestOutcome::new(name, TestStatus::Pass);
    outcome.duration = attr(e, "time")?.and_then(|t| t.parse().ok());
    Ok(outcome)
}

fn result_status(tag: &[u8]) -> Option<TestStatus> {
    match tag {
        b"failure" => Some(TestStatus::Fail),
        b"error" => Some(TestStatus::Broken),
        b"skipped" => Some(TestStatus::Skip),
        _ => None,
    }
}

/// Parse every `<testcase>` in document order.
///
/// Accepts a `<testsuites>` root or a bare `<testsuite>`; suites may nest.
pub fn parse_results(xml: &str) -> Result<Vec<TestOutcome>, TranslateError> {
    if xml.trim().is_empty() {
        return Err(TranslateError::EmptyResults);
    }

    let mut reader = Reader::from_str(xml);
    let mut outcomes = Vec::new();
    let mut current: Option<TestOutcome> = None;
    // Inside a <failure>/<error>/<skipped> whose text belongs to the message.
    let mut in_result = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = e.local_name();
                if tag.as_ref() == b"testcase" {
                    current = Some(start_case(&e)?);
                } else if let (Some(status), Some(case)) =
                    (result_status(tag.as_ref()), current.as_mut())
                {
                    case.status = status;
                    if let Some(message) = attr(&e, "message")? {
                        case.append_message(&message);
                    }
                    in_result = true;
                }
            }
            Event::Empty(e) => {
                let tag = e.local_name();
                if tag.as_ref() == b"testcase" {
                    outcomes.push(start_case(&e)?);
                } else if let (Some(status), Some(case)) =
                    (result_status(tag.as_ref()), current.as_mut())
                {
                    case.status = status;
                    if let Some(message) = attr(&e, "message")? {
                        case.append_message(&message);
                    }
                }
            }
            Event::Text(text) if in_result => {
                if let Some(case) = current.as_mut() {
                    case.append_message(&text.unescape()?);
                }
            }
            Event::CData(data) if in_result => {
                if let Some(case) = current.as_mut() {
                    case.append_message(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(e) => {
                let tag = e.local_name();
                if tag.as_ref() == b"testcase" {
                    outcomes.extend(current.take());
                    in_result = false;
                } else if result_status(tag.as_ref()).is_some() {
                    in_result = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(outcomes)
}
