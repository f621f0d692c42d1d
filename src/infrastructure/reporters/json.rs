//! JSON line renderer.

use crate::application::ports::{Reporter, ReporterError};
use crate::application::registry::ReporterOptions;
use crate::domain::message::LogMessage;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Renders one JSON object per line.
///
/// Fields: `timestamp` (RFC 3339, UTC), `tags`, `message`. The
/// `tags_object` setting turns the tag array into a `{tag: true}` map;
/// an `additional` settings object is merged into every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for JsonReporter {
    fn log(
        &self,
        options: &ReporterOptions,
        tags: Vec<String>,
        message: LogMessage,
    ) -> Result<Option<String>, ReporterError> {
        let tags = if options.setting_bool("tags_object", false) {
            Value::Object(tags.into_iter().map(|tag| (tag, json!(true))).collect())
        } else {
            Value::Array(tags.into_iter().map(Value::String).collect())
        };
        let message = match message {
            LogMessage::Text(text) => Value::String(text),
            LogMessage::Data(value) => value,
            LogMessage::Error(details) => details.to_record(),
        };

        let mut record = Map::new();
        record.insert(
            "timestamp".to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        record.insert("tags".to_string(), tags);
        record.insert("message".to_string(), message);
        if let Some(Value::Object(additional)) = options.setting("additional") {
            for (key, value) in additional {
                record.insert(key.clone(), value.clone());
            }
        }

        Ok(Some(serde_json::to_string(&record)?))
    }
}
