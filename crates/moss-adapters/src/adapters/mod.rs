//! Lint adapters.
//!
//! Each adapter wraps an external tool and provides:
//! - Availability and version detection
//! - Project relevance detection
//! - Output parsing to diagnostics

mod eslint;
mod sass_lint;
mod scss_lint;
mod stylelint;

pub use eslint::Eslint;
pub use sass_lint::SassLint;
pub use scss_lint::{EXIT_CODE_NAMES, ScssLint, UNKNOWN_NAME, exit_code_name};
pub use stylelint::Stylelint;

use crate::Tool;

/// Create a registry with all built-in adapters.
pub fn all_adapters() -> Vec<Box<dyn Tool>> {
    vec![
        // JavaScript
        Box::new(Eslint::new()),
        // CSS/SCSS
        Box::new(Stylelint::new()),
        Box::new(SassLint::new()),
        Box::new(ScssLint::new()),
    ]
}
