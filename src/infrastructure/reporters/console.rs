//! Plain console renderer.

use crate::application::ports::{Reporter, ReporterError};
use crate::application::registry::{ReporterOptions, ReporterOptionsPatch};
use crate::domain::message::LogMessage;
use chrono::Local;
use serde_json::json;

/// Renders `HH:MM:SS [tag1,tag2] message`.
///
/// The `timestamp` setting (default `true`) toggles the time prefix.
/// Structured messages render as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn defaults(&self) -> ReporterOptionsPatch {
        ReporterOptionsPatch::new().with_setting("timestamp", json!(true))
    }

    fn log(
        &self,
        options: &ReporterOptions,
        tags: Vec<String>,
        message: LogMessage,
    ) -> Result<Option<String>, ReporterError> {
        let ts = if options.setting_bool("timestamp", true) {
            format!("{} ", Local::now().format("%H:%M:%S"))
        } else {
            String::new()
        };
        Ok(Some(format!("{ts}[{}] {message}", tags.join(","))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(options: &ReporterOptions, tags: &[&str], message: LogMessage) -> String {
        ConsoleReporter::new()
            .log(options, tags.iter().map(|t| t.to_string()).collect(), message)
            .expect("console rendering never faults")
            .expect("console always renders a line")
    }

    fn without_timestamp() -> ReporterOptions {
        let mut options = ReporterOptions::default();
        options.settings.insert("timestamp".to_string(), json!(false));
        options
    }

    #[test]
    fn test_renders_tags_and_text() {
        let line = render(
            &without_timestamp(),
            &["debug", "api"],
            LogMessage::from("loading"),
        );
        assert_eq!(line, "[debug,api] loading");
    }

    #[test]
    fn test_renders_structured_message_as_json() {
        let line = render(
            &without_timestamp(),
            &["debug"],
            LogMessage::from(json!({ "answer": 42 })),
        );
        assert_eq!(line, r#"[debug] {"answer":42}"#);
    }

    #[test]
    fn test_timestamp_prefix_is_on_by_default() {
        let line = render(&ReporterOptions::default(), &["a"], LogMessage::from("x"));
        // HH:MM:SS then a space then the tag block.
        assert_eq!(line.as_bytes()[2], b':');
        assert_eq!(line.as_bytes()[5], b':');
        assert!(line.ends_with("[a] x"));
    }

    #[test]
    fn test_empty_tags_render_empty_brackets() {
        let line = render(&without_timestamp(), &[], LogMessage::from("x"));
        assert_eq!(line, "[] x");
    }
}
