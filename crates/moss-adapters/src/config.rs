//! Adapter configuration.
//!
//! Settings live in `.moss/adapters.toml`:
//!
//! ```toml
//! [linters.eslint]
//! env = "browser"
//! config = ".eslintrc.json"
//!
//! [tests]
//! coverage = true
//! wrapper = "./bin/coverage-wrapper.sh"
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-adapter settings, passed explicitly into every adapter call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdapterConfig {
    /// Environment preset (eslint `--env`).
    #[serde(default)]
    pub env: Option<String>,
    /// Tool config file to use instead of the tool's own lookup.
    #[serde(default, rename = "config", alias = "config_path")]
    pub config_path: Option<String>,
}

impl AdapterConfig {
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }
}

/// Settings for the test runner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestsConfig {
    /// Collect line coverage alongside test results.
    #[serde(default = "default_coverage")]
    pub coverage: bool,
    /// Script that runs a command under coverage and exports the report.
    #[serde(default = "default_wrapper")]
    pub wrapper: PathBuf,
}

fn default_coverage() -> bool {
    true
}

fn default_wrapper() -> PathBuf {
    PathBuf::from("./bin/coverage-wrapper.sh")
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            coverage: default_coverage(),
            wrapper: default_wrapper(),
        }
    }
}

/// Top-level adapter configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdaptersConfig {
    #[serde(default)]
    pub linters: HashMap<String, AdapterConfig>,
    #[serde(default)]
    pub tests: TestsConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl AdaptersConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `.moss/adapters.toml` under `root`. A missing file yields defaults.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(".moss").join("adapters.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Settings for one linter; defaults when unconfigured.
    pub fn linter(&self, name: &str) -> AdapterConfig {
        self.linters.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_linter_sections() {
        let config = AdaptersConfig::from_toml(
            r#"
[linters.eslint]
env = "browser"
config = ".eslintrc.json"

[linters.stylelint]
config_path = "stylelint.config.js"
"#,
        )
        .unwrap();

        let eslint = config.linter("eslint");
        assert_eq!(eslint.env.as_deref(), Some("browser"));
        assert_eq!(eslint.config_path.as_deref(), Some(".eslintrc.json"));
        assert_eq!(
            config.linter("stylelint").config_path.as_deref(),
            Some("stylelint.config.js")
        );
        assert_eq!(config.linter("scss-lint"), AdapterConfig::default());
        assert!(config.tests.coverage);
    }

    #[test]
    fn test_tests_section() {
        let config = AdaptersConfig::from_toml(
            r#"
[tests]
coverage = false
wrapper = "tools/cov.sh"
"#,
        )
        .unwrap();
        assert!(!config.tests.coverage);
        assert_eq!(config.tests.wrapper, PathBuf::from("tools/cov.sh"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AdaptersConfig::load(dir.path()).unwrap();
        assert!(config.linters.is_empty());
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".moss")).unwrap();
        std::fs::write(dir.path().join(".moss/adapters.toml"), "linters = 3").unwrap();
        assert!(matches!(
            AdaptersConfig::load(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
