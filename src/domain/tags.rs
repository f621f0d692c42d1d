//! Tag lists and matching predicates.
//!
//! Every log entry carries a list of string tags, and every routing
//! decision is driven by them: a reporter's `filter` list admits entries,
//! its `exclude` list rejects them. Matching uses set semantics (presence
//! only), while the list itself stays ordered because default tags are
//! prepended and throttle signatures are order-sensitive.

use std::fmt;

/// An ordered list of string tags attached to a log entry.
///
/// Duplicates are allowed and have no effect on matching. Comparison is
/// case-sensitive exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Create an empty tag list.
    pub const fn empty() -> Self {
        Tags(Vec::new())
    }

    /// Append a tag to the end of the list.
    pub fn push(&mut self, tag: impl Into<String>) {
        self.0.push(tag.into());
    }

    /// True when the exact tag is present.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Borrow the tags as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Clone the tags out into a plain vector.
    ///
    /// Reporters receive their own copy, so one reporter mutating its
    /// tags never affects what a sibling sees.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }

    /// Insert `tags` ahead of the existing entries, preserving both
    /// relative orders.
    pub(crate) fn prepend(&mut self, tags: &[String]) {
        self.0.splice(0..0, tags.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Tags {
    /// Comma-joined, without brackets: `a,b,c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Tags(tags)
    }
}

impl From<&[String]> for Tags {
    fn from(tags: &[String]) -> Self {
        Tags(tags.to_vec())
    }
}

impl From<&[&str]> for Tags {
    fn from(tags: &[&str]) -> Self {
        Tags(tags.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Tags {
    fn from(tags: [&str; N]) -> Self {
        Tags(tags.iter().map(|t| t.to_string()).collect())
    }
}

impl FromIterator<String> for Tags {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Tags(iter.into_iter().collect())
    }
}

/// Does a tag list pass a reporter's filter?
///
/// An empty filter passes everything. A non-empty filter passes exactly
/// when it shares at least one tag with the entry.
pub fn filter_match(filter: &[String], tags: &[String]) -> bool {
    if filter.is_empty() {
        return true;
    }
    filter.iter().any(|f| tags.contains(f))
}

/// Is a tag list rejected by a reporter's exclude list?
///
/// True exactly when the exclude list shares at least one tag with the
/// entry; an empty exclude list never rejects. When both a filter and an
/// exclude match, exclusion wins (the caller checks exclusion after the
/// filter).
pub fn exclude_match(exclude: &[String], tags: &[String]) -> bool {
    exclude.iter().any(|e| tags.contains(e))
}
