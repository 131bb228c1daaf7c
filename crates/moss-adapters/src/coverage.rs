//! Line coverage reports.
//!
//! Reads a Cobertura-style document (`<class filename="..."><line number="3" hits="0"/>`)
//! and turns each module entry into a dense per-line annotation:
//!
//! - `N`: no data reported for the line
//! - `U`: reported, executed zero times
//! - `C`: reported, executed at least once
//!
//! Module entries are keyed by a dotted identifier such as `tornado.web.py`,
//! which is mapped back onto a source file in the project.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// Relative source path to coverage annotation.
pub type CoverageMap = BTreeMap<String, String>;

/// Coverage state of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCoverage {
    NoData,
    Uncovered,
    Covered,
}

impl LineCoverage {
    pub fn from_hits(hits: Option<u64>) -> Self {
        match hits {
            None => Self::NoData,
            Some(0) => Self::Uncovered,
            Some(_) => Self::Covered,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::NoData => 'N',
            Self::Uncovered => 'U',
            Self::Covered => 'C',
        }
    }
}

/// How module identifiers map onto files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    /// File that stands for a package directory.
    pub index_file: String,
    /// Source file extension, without the dot.
    pub extension: String,
}

impl ModuleLayout {
    pub fn python() -> Self {
        Self {
            index_file: "__init__.py".to_string(),
            extension: "py".to_string(),
        }
    }
}

impl Default for ModuleLayout {
    fn default() -> Self {
        Self::python()
    }
}

/// Read-only view of the project files coverage is resolved against.
///
/// Paths are relative to the project root.
pub trait SourceTree {
    fn is_dir(&self, path: &str) -> bool;
    fn is_file(&self, path: &str) -> bool;
    /// Number of physical lines in the file.
    fn line_count(&self, path: &str) -> io::Result<usize>;
}

/// [`SourceTree`] backed by the real filesystem.
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
}

impl DiskTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceTree for DiskTree {
    fn is_dir(&self, path: &str) -> bool {
        self.root.join(path).is_dir()
    }

    fn is_file(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }

    fn line_count(&self, path: &str) -> io::Result<usize> {
        Ok(count_lines(&std::fs::read(self.root.join(path))?))
    }
}

/// Count physical lines; a final line without a trailing newline still counts.
pub fn count_lines(bytes: &[u8]) -> usize {
    let newlines = bytes.iter().filter(|b| **b == b'\n').count();
    newlines + usize::from(!bytes.is_empty() && !bytes.ends_with(b"\n"))
}

/// Hit counts reported for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleCoverage {
    /// Dotted module identifier as reported (e.g. `tornado.web.py`).
    pub filename: String,
    /// Line number to hit count. A line reported twice keeps the last count.
    pub hits: BTreeMap<usize, u64>,
}

fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    let attr = e.try_get_attribute(name).ok()??;
    attr.unescape_value().ok().map(|v| v.into_owned())
}

/// Parse every `<class>` entry in a coverage document.
///
/// Parsing is best effort: if the document turns out to be malformed, the
/// entries completed before the fault are returned.
pub fn parse_report(xml: &str) -> Vec<ModuleCoverage> {
    let mut reader = Reader::from_str(xml);
    let mut modules = Vec::new();
    let mut current: Option<ModuleCoverage> = None;

    loop {
        let (event, closed) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, false),
            Ok(Event::Empty(e)) => (e, true),
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"class" {
                    modules.extend(current.take());
                }
                continue;
            }
            Ok(Event::Eof) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(
                    position = reader.buffer_position(),
                    "malformed coverage report, keeping {} entries: {e}",
                    modules.len()
                );
                break;
            }
        };

        match event.local_name().as_ref() {
            b"class" => {
                let module = attr(&event, "filename").map(|filename| ModuleCoverage {
                    filename,
                    hits: BTreeMap::new(),
                });
                if closed {
                    modules.extend(module);
                } else {
                    current = module;
                }
            }
            b"line" => {
                let Some(module) = current.as_mut() else {
                    continue;
                };
                let number = attr(&event, "number").and_then(|n| n.parse::<usize>().ok());
                let hits = attr(&event, "hits").and_then(|h| h.parse::<u64>().ok());
                if let (Some(number), Some(hits)) = (number, hits) {
                    module.hits.insert(number, hits);
                }
            }
            _ => {}
        }
    }

    modules
}

/// Ways a module identifier can name a file, tried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// The identifier names a package directory; use its index file.
    PackageIndex,
    /// The identifier plus the source extension names a file.
    ModuleFile,
}

const RESOLUTION_ORDER: [Resolution; 2] = [Resolution::PackageIndex, Resolution::ModuleFile];

impl Resolution {
    fn applies(self, candidate: &str, layout: &ModuleLayout, tree: &dyn SourceTree) -> bool {
        match self {
            Self::PackageIndex => tree.is_dir(candidate),
            Self::ModuleFile => tree.is_file(&self.path(candidate, layout)),
        }
    }

    fn path(self, candidate: &str, layout: &ModuleLayout) -> String {
        match self {
            Self::PackageIndex => format!("{candidate}/{}", layout.index_file),
            Self::ModuleFile => format!("{candidate}.{}", layout.extension),
        }
    }
}

/// Turn a dotted module identifier into a slash-separated path without the
/// final (extension) segment. `tornado.web.py` becomes `tornado/web`.
pub fn module_candidate(filename: &str) -> Option<String> {
    let (stem, _extension) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.replace('.', "/"))
}

/// Resolve a module identifier to an existing source file.
///
/// The first applicable strategy decides the path; if that file does not
/// exist the entry is unresolvable.
pub fn resolve_module(
    filename: &str,
    layout: &ModuleLayout,
    tree: &dyn SourceTree,
) -> Option<String> {
    let candidate = module_candidate(filename)?;
    let strategy = RESOLUTION_ORDER
        .into_iter()
        .find(|s| s.applies(&candidate, layout, tree))?;
    let path = strategy.path(&candidate, layout);
    tree.is_file(&path).then_some(path)
}

/// Build the dense annotation for a file of `line_count` lines.
///
/// Reported lines past the end of the file are ignored.
pub fn annotate(hits: &BTreeMap<usize, u64>, line_count: usize) -> String {
    (1..=line_count)
        .map(|n| LineCoverage::from_hits(hits.get(&n).copied()).as_char())
        .collect()
}

/// Build coverage annotations for the requested files.
///
/// Entries that do not resolve to a file, or resolve to a file outside
/// `requested`, are dropped. An empty document yields an empty map.
pub fn read_coverage(
    xml: &str,
    requested: &[String],
    layout: &ModuleLayout,
    tree: &dyn SourceTree,
) -> CoverageMap {
    let mut reports = CoverageMap::new();
    if xml.trim().is_empty() {
        return reports;
    }

    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();
    for module in parse_report(xml) {
        let Some(path) = resolve_module(&module.filename, layout, tree) else {
            tracing::debug!(module = %module.filename, "no source file for coverage entry");
            continue;
        };
        if !requested.contains(path.as_str()) {
            continue;
        }

        let line_count = match tree.line_count(&path) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(path = %path, "cannot count lines: {e}");
                continue;
            }
        };
        if module.hits.keys().next_back().is_some_and(|last| *last > line_count) {
            tracing::debug!(path = %path, line_count, "coverage reports lines past end of file");
        }

        reports.insert(path, annotate(&module.hits, line_count));
    }
    reports
}
