//! Basic example demonstrating tag-based fan-out.
//!
//! This example registers two reporters with different filters, logs
//! text, structured, and error messages, and shows the blacklist
//! redaction in action.

use futures::executor::block_on;
use logfan::{LogMessage, Logger, ReporterOptionsPatch, ReporterSpec};
use serde_json::json;

fn main() {
    // A console reporter for everything, a JSON reporter for api entries
    let logger = Logger::builder()
        .with_reporter("console", ReporterSpec::named("console"))
        .with_reporter_options(
            "api-json",
            ReporterSpec::named("json"),
            ReporterOptionsPatch::new().with_filter(vec!["api".to_string()]),
        )
        .with_default_tags(vec!["demo".to_string()])
        .build()
        .expect("valid configuration");

    println!("=== Tag Fan-Out Example ===\n");

    block_on(async {
        // Reaches the console reporter only
        logger.log(["info", "server"], "listening on :8080").await;

        // Reaches both: the api tag matches the JSON reporter's filter
        logger
            .log(["api", "debug"], json!({ "route": "/users", "status": 200 }))
            .await;

        // Structured values under blacklisted keys are redacted
        logger
            .log(
                ["api", "auth"],
                json!({ "user": "kim", "password": "hunter2" }),
            )
            .await;

        // Errors become { message, stack } records and gain the error tag
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk offline");
        logger.log(["db"], LogMessage::error(&err)).await;
    });

    println!("\n=== Example Complete ===");
    println!("Notice: the password value was replaced before any reporter ran.");
}
