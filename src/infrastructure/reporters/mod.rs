//! Built-in reporters.
//!
//! Three renderers cover the common cases: `console` for development
//! output, `json` for machine-readable lines, `cli` for colored command
//! line tools. Each can be registered by name or replaced wholesale by a
//! caller-supplied [`Reporter`](crate::application::ports::Reporter).

use crate::application::ports::Reporter;
use std::sync::Arc;

pub mod cli;
pub mod console;
pub mod json;

pub use cli::CliReporter;
pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Resolve a built-in reporter by its registration name.
pub(crate) fn built_in(name: &str) -> Option<Arc<dyn Reporter>> {
    match name {
        "console" => Some(Arc::new(ConsoleReporter::new())),
        "json" => Some(Arc::new(JsonReporter::new())),
        "cli" => Some(Arc::new(CliReporter::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_table() {
        assert!(built_in("console").is_some());
        assert!(built_in("json").is_some());
        assert!(built_in("cli").is_some());
        assert!(built_in("syslog").is_none());
    }
}
