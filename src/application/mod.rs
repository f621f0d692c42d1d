//! Application layer - orchestration of the dispatch pipeline.
//!
//! This layer coordinates the domain logic and manages runtime behavior:
//! - Reporter registration and option resolution
//! - Windowed throttling per reporter
//! - The dispatch engine driving one call through matching, throttling,
//!   invocation, and fault isolation
//! - Dispatch metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters and caller-supplied reporters implement. This keeps the
//! engine independent from any concrete clock, sink, or renderer.

pub(crate) mod dispatcher;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod throttle;
