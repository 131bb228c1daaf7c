//! Tool registry for discovering and running adapters.

use crate::{AdaptersConfig, Diagnostic, Tool, ToolResult};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Registry of available tools.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry with all built-in tools.
    pub fn with_builtins() -> Self {
        crate::default_registry()
    }

    /// Register a tool.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Get all registered tools.
    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.info().name == name)
            .map(|t| t.as_ref())
    }

    /// Tools that lint files like `path`.
    pub fn tools_for(&self, path: &Path) -> Vec<&dyn Tool> {
        self.tools
            .iter()
            .filter(|t| t.handles(path))
            .map(|t| t.as_ref())
            .collect()
    }

    /// Detect which tools are relevant for a project.
    ///
    /// Returns tools sorted by relevance (highest first).
    /// Only checks availability for tools with positive detection scores.
    pub fn detect(&self, root: &Path) -> Vec<(&dyn Tool, f32)> {
        let mut relevant: Vec<_> = self
            .tools
            .iter()
            .map(|t| (t.as_ref(), t.detect(root)))
            .filter(|(_, score)| *score > 0.0)
            .filter(|(t, _)| t.is_available())
            .collect();

        relevant.sort_by(|a, b| b.1.total_cmp(&a.1));
        relevant
    }

    /// Run the named tools on every path they handle.
    ///
    /// Paths are linted in parallel. A tool that cannot run yields a failed
    /// [`ToolResult`] for that path; other paths are unaffected.
    pub fn run_named(
        &self,
        names: &[&str],
        root: &Path,
        paths: &[PathBuf],
        config: &AdaptersConfig,
    ) -> Vec<ToolResult> {
        let selected: Vec<&dyn Tool> = self
            .tools
            .iter()
            .filter(|t| names.contains(&t.info().name))
            .map(|t| t.as_ref())
            .collect();
        run_tools(&selected, root, paths, config)
    }

    /// Run every detected tool on the paths it handles.
    pub fn run_detected(
        &self,
        root: &Path,
        paths: &[PathBuf],
        config: &AdaptersConfig,
    ) -> Vec<ToolResult> {
        let detected: Vec<&dyn Tool> = self.detect(root).into_iter().map(|(t, _)| t).collect();
        run_tools(&detected, root, paths, config)
    }

    /// Collect all diagnostics from multiple tool results.
    pub fn collect_diagnostics(results: &[ToolResult]) -> Vec<Diagnostic> {
        results.iter().flat_map(|r| r.diagnostics.clone()).collect()
    }
}

fn run_tools(
    tools: &[&dyn Tool],
    root: &Path,
    paths: &[PathBuf],
    config: &AdaptersConfig,
) -> Vec<ToolResult> {
    let mut usable = Vec::new();
    let mut results = Vec::new();
    for tool in tools {
        if !paths.iter().any(|p| tool.handles(p)) {
            continue;
        }
        match tool.check_version() {
            Ok(()) => usable.push(*tool),
            Err(e) => {
                tracing::warn!(tool = tool.info().name, "{e}");
                results.extend(
                    paths
                        .iter()
                        .filter(|p| tool.handles(p))
                        .map(|p| ToolResult::failure(tool.info().name, p, &e)),
                );
            }
        }
    }

    let jobs: Vec<(&dyn Tool, &PathBuf)> = usable
        .iter()
        .flat_map(|tool| {
            paths
                .iter()
                .filter(move |p| tool.handles(p))
                .map(move |p| (*tool, p))
        })
        .collect();

    results.par_extend(jobs.into_par_iter().map(|(tool, path)| {
        let name = tool.info().name;
        tool.run(path, root, &config.linter(name))
            .unwrap_or_else(|e| ToolResult::failure(name, path, e))
    }));
    results
}
