//! Serialization tests through the public API: error records, the
//! error tag, response errors, and blacklist redaction.

use logfan::infrastructure::mocks::CaptureSink;
use logfan::{error_value, LogMessage, Logger, ReporterSpec, ResponseError};
use serde_json::{json, Value};
use std::io;
use std::sync::Arc;

/// Reporter that renders the received tags and record as one JSON line,
/// so tests can assert on exactly what reporters were handed.
fn probe() -> ReporterSpec {
    ReporterSpec::callback(|_options, tags, message| {
        let record = match &message {
            LogMessage::Data(value) => value.clone(),
            other => json!(other.to_string()),
        };
        Some(json!({ "tags": tags, "record": record }).to_string())
    })
}

fn captured(sink: &CaptureSink) -> Value {
    let lines = sink.lines();
    assert_eq!(lines.len(), 1, "expected exactly one rendered line");
    serde_json::from_str(&lines[0]).unwrap()
}

fn probe_logger(sink: &CaptureSink) -> Logger {
    Logger::builder()
        .with_reporter("probe", probe())
        .with_sink(Arc::new(sink.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_error_becomes_record_with_error_tag() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);
    let err = io::Error::new(io::ErrorKind::Other, "disk on fire");

    logger.log(["db"], LogMessage::error(&err)).await;

    let seen = captured(&sink);
    assert_eq!(seen["tags"], json!(["db", "error"]));
    assert_eq!(seen["record"]["message"], "disk on fire");
    assert!(seen["record"]["stack"]
        .as_str()
        .unwrap()
        .contains("disk on fire"));
}

#[tokio::test]
async fn test_error_tag_is_not_duplicated() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);
    let err = io::Error::new(io::ErrorKind::Other, "boom");

    logger.log(["error", "db"], LogMessage::error(&err)).await;

    let seen = captured(&sink);
    assert_eq!(seen["tags"], json!(["error", "db"]));
}

#[tokio::test]
async fn test_add_error_tag_can_be_disabled() {
    let sink = CaptureSink::new();
    let logger = Logger::builder()
        .with_reporter("probe", probe())
        .with_add_error_tag(false)
        .with_sink(Arc::new(sink.clone()))
        .build()
        .unwrap();
    let err = io::Error::new(io::ErrorKind::Other, "boom");

    logger.log(["db"], LogMessage::error(&err)).await;

    let seen = captured(&sink);
    // No tag, but the record conversion still happens
    assert_eq!(seen["tags"], json!(["db"]));
    assert_eq!(seen["record"]["message"], "boom");
}

#[tokio::test]
async fn test_response_error_record_shape() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);
    let err = ResponseError::new(503, "Service Unavailable", json!({ "retry_in": 30 }));

    logger.log(["upstream"], LogMessage::error(&err)).await;

    let seen = captured(&sink);
    assert_eq!(seen["tags"], json!(["upstream", "error"]));
    assert_eq!(
        seen["record"]["message"],
        "Response Error: 503 Service Unavailable"
    );
    assert_eq!(seen["record"]["statusCode"], 503);
    assert_eq!(seen["record"]["payload"]["retry_in"], 30);
    assert!(seen["record"].get("stack").is_none());
}

#[tokio::test]
async fn test_default_blacklist_redacts_password_and_token() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);

    logger
        .log(
            ["auth"],
            json!({
                "user": "kim",
                "Password": "hunter2",
                "api_token": "abc123",
            }),
        )
        .await;

    let seen = captured(&sink);
    assert_eq!(seen["record"]["user"], "kim");
    // Case-insensitive, and substring matches count
    assert_eq!(seen["record"]["Password"], "xxxxxx");
    assert_eq!(seen["record"]["api_token"], "xxxxxx");
}

#[tokio::test]
async fn test_redaction_walks_nested_objects_and_arrays() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);

    logger
        .log(
            ["auth"],
            json!({
                "attempts": [
                    { "password": "first" },
                    { "note": "clean" },
                ],
                "session": { "inner": { "token": "xyz" } },
            }),
        )
        .await;

    let seen = captured(&sink);
    assert_eq!(seen["record"]["attempts"][0]["password"], "xxxxxx");
    assert_eq!(seen["record"]["attempts"][1]["note"], "clean");
    assert_eq!(seen["record"]["session"]["inner"]["token"], "xxxxxx");
}

#[tokio::test]
async fn test_custom_blacklist_replaces_the_default() {
    let sink = CaptureSink::new();
    let logger = Logger::builder()
        .with_reporter("probe", probe())
        .with_blacklist("spader")
        .with_sink(Arc::new(sink.clone()))
        .build()
        .unwrap();

    logger
        .log(["x"], json!({ "james": "1", "spader": "2", "password": "kept" }))
        .await;

    let seen = captured(&sink);
    assert_eq!(seen["record"]["james"], "1");
    assert_eq!(seen["record"]["spader"], "xxxxxx");
    // The default pattern no longer applies
    assert_eq!(seen["record"]["password"], "kept");
}

#[tokio::test]
async fn test_callers_value_is_never_modified() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);
    let original = json!({ "password": "hunter2" });

    // Logged by reference; redaction happens on an internal copy
    logger.log(["auth"], &original).await;

    assert_eq!(original["password"], "hunter2");
    let seen = captured(&sink);
    assert_eq!(seen["record"]["password"], "xxxxxx");
}

#[tokio::test]
async fn test_embedded_error_value_passes_through_without_tag() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);
    let err = io::Error::new(io::ErrorKind::Other, "inner failure");

    // The error record is embedded in a structured message, so this is
    // not an error-shaped call and gains no tag.
    logger
        .log(["job"], json!({ "step": "sync", "cause": error_value(&err) }))
        .await;

    let seen = captured(&sink);
    assert_eq!(seen["tags"], json!(["job"]));
    assert_eq!(seen["record"]["cause"]["message"], "inner failure");
}

#[tokio::test]
async fn test_text_messages_pass_through_untouched() {
    let sink = CaptureSink::new();
    let logger = probe_logger(&sink);

    logger.log(["note"], "password stays in plain text").await;

    let seen = captured(&sink);
    assert_eq!(seen["record"], "password stays in plain text");
}
