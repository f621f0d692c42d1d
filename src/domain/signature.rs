//! Throttle signature computation.
//!
//! When a reporter throttles per tag combination, the entry's tag
//! sequence is reduced to a signature key; entries with the same
//! signature share one throttle window. Reporters that throttle without
//! regard to tags use the single shared signature instead.

use ahash::AHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A key identifying one throttle window.
///
/// Hashing is order-sensitive: `["a", "b"]` and `["b", "a"]` throttle
/// independently, exactly as a joined-string key would. Hashing each tag
/// separately also means a tag containing the join separator cannot
/// collide with a pair of tags that happen to spell the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThrottleSignature(u64);

impl ThrottleSignature {
    /// Compute the signature of a tag sequence.
    ///
    /// # Performance
    /// This runs on the hot path of every throttled dispatch, so it uses
    /// the fast ahash algorithm and never allocates.
    pub fn from_tags(tags: &[String]) -> Self {
        let mut hasher = AHasher::default();
        for tag in tags {
            tag.hash(&mut hasher);
        }
        ThrottleSignature(hasher.finish())
    }

    /// The shared signature used when throttling ignores tags.
    ///
    /// Equal to the signature of an empty tag sequence, which gives the
    /// same observable behavior either way: all such entries contend for
    /// one window.
    pub fn all() -> Self {
        Self::from_tags(&[])
    }

    /// Pick the signature for one entry given the reporter's mode.
    pub fn for_entry(based_on_tags: bool, tags: &[String]) -> Self {
        if based_on_tags {
            Self::from_tags(tags)
        } else {
            Self::all()
        }
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThrottleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
