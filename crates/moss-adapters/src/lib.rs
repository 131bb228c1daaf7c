//! Adapters that normalize external tool output.
//!
//! Lint tools and test runners print human-oriented text and XML in their
//! own dialects. This crate turns that output into one record shape:
//!
//! - **Lint adapters**: eslint, sass-lint and stylelint (stylish output),
//!   scss-lint (`path:line [E|W] message`) produce [`Diagnostic`]s.
//! - **Test runners**: pytest results (JUnit XML) become [`TestOutcome`]s,
//!   each annotated with per-file line coverage (`N`/`U`/`C` per line).
//!
//! Parsing never aborts on an unrecognized line; such lines are skipped.
//! Only output that looks like a finding but breaks the grammar is an error.
//!
//! # Configuration
//!
//! Adapters are configured in `.moss/adapters.toml`:
//!
//! ```toml
//! [linters.eslint]
//! env = "browser"
//! config = ".eslintrc.json"
//!
//! [tests]
//! coverage = true
//! ```
//!
//! # Example
//!
//! ```ignore
//! use moss_adapters::{AdaptersConfig, ToolRegistry};
//!
//! let config = AdaptersConfig::load(root)?;
//! let registry = ToolRegistry::with_builtins();
//! let results = registry.run_detected(root, &paths, &config);
//! let diagnostics = ToolRegistry::collect_diagnostics(&results);
//! ```

pub mod adapters;
mod config;
pub mod coverage;
mod diagnostic;
pub mod junit;
mod registry;
pub mod stylish;
pub mod test_runners;
mod tools;
mod translate;

pub use config::{AdapterConfig, AdaptersConfig, ConfigError, TestsConfig};
pub use coverage::{CoverageMap, DiskTree, ModuleLayout, SourceTree};
pub use diagnostic::{Diagnostic, Severity};
pub use junit::{TestOutcome, TestStatus};
pub use registry::ToolRegistry;
pub use tools::{
    LintOutcome, Tool, ToolError, ToolInfo, ToolOutput, ToolResult, has_config_file,
    meets_minimum,
};
pub use translate::{TranslateError, Translation, translate};

/// Create a registry with all built-in tools.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in adapters::all_adapters() {
        registry.register(tool);
    }
    registry
}
