//! Throttling example: per-reporter windows and tag-based windows.
//!
//! This example floods a throttled reporter, shows how a window capped
//! at one emission per second behaves, and prints the dispatch metrics
//! at the end.

use futures::executor::block_on;
use logfan::{Logger, ReporterOptionsPatch, ReporterSpec, Throttle};
use std::thread::sleep;
use std::time::Duration;

fn main() {
    let logger = Logger::builder()
        // At most one line per second, shared by all tags
        .with_reporter_options(
            "console",
            ReporterSpec::named("console"),
            ReporterOptionsPatch::new().with_throttle(Throttle::Millis(1_000)),
        )
        // One line per second per tag combination
        .with_reporter_options(
            "per-tag",
            ReporterSpec::callback(|_options, tags, message| {
                Some(format!("per-tag [{}] {}", tags.join(","), message))
            }),
            ReporterOptionsPatch::new()
                .with_throttle(Throttle::Millis(1_000))
                .with_throttle_based_on_tags(true),
        )
        .build()
        .expect("valid configuration");

    println!("=== Throttling Example ===\n");
    println!("Policy: one emission per second per reporter\n");

    block_on(async {
        println!("Burst of 5 calls (console emits once, per-tag once per tag):");
        for i in 1..=5 {
            logger.log(["worker"], format!("burst message {i}")).await;
            logger.log(["billing"], format!("burst message {i}")).await;
        }

        sleep(Duration::from_millis(1_100));

        println!("\nAfter the window reopens:");
        logger.log(["worker"], "the window has passed").await;
    });

    let snapshot = logger.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "delivered: {}, throttled: {}, delivery rate: {:.0}%",
        snapshot.delivered,
        snapshot.throttled,
        snapshot.delivery_rate() * 100.0
    );
}
