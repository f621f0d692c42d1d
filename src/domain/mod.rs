//! Domain layer - pure log-entry logic with no external integrations.
//!
//! This layer contains the core concepts and invariants of log fan-out:
//! - Tag lists and the filter/exclude matching predicates
//! - Log message representation, including captured error details
//! - Blacklist redaction of sensitive keys
//! - Entry serialization (error values become plain records)
//! - Throttle signature computation
//!
//! All types in this layer are pure and easily testable.

pub mod message;
pub mod redact;
pub mod serialize;
pub mod signature;
pub mod tags;
