//! Blacklist redaction of sensitive keys.
//!
//! Structured messages are walked before dispatch and any key matching
//! the blacklist pattern has its value replaced with a fixed marker, so
//! secrets never reach a reporter or the sink.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// The replacement written over blacklisted values.
pub const REDACTED: &str = "xxxxxx";

/// The default blacklist pattern.
pub const DEFAULT_BLACKLIST: &str = "password|token";

/// A compiled, case-insensitive key blacklist.
#[derive(Debug, Clone)]
pub struct Blacklist {
    pattern: Regex,
}

impl Blacklist {
    /// Compile a blacklist from a regex source.
    ///
    /// Matching is case-insensitive and unanchored, so `password` matches
    /// the keys `password`, `Password1`, and `userPassword` alike.
    ///
    /// # Errors
    /// Returns the regex compile error for a malformed pattern; the
    /// caller treats that as a fatal configuration error.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Blacklist { pattern })
    }

    /// The built-in `password|token` blacklist.
    pub fn default_pattern() -> Self {
        Self::new(DEFAULT_BLACKLIST).expect("default blacklist pattern is always valid")
    }

    /// Does a key match the blacklist?
    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }

    /// Walk a structured value, overwriting the value of every matching
    /// key with [`REDACTED`]. Arrays and nested records are walked
    /// recursively; scalars under non-matching keys are left alone.
    pub fn redact(&self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, entry) in map.iter_mut() {
                    if self.matches(key) {
                        *entry = Value::String(REDACTED.to_string());
                    } else {
                        self.redact(entry);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.redact(item);
                }
            }
            _ => {}
        }
    }
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::default_pattern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_pattern_matches_password_and_token() {
        let blacklist = Blacklist::default_pattern();
        assert!(blacklist.matches("password"));
        assert!(blacklist.matches("token"));
        assert!(blacklist.matches("apiToken"));
        assert!(!blacklist.matches("user"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let blacklist = Blacklist::default_pattern();
        assert!(blacklist.matches("PASSWORD"));
        assert!(blacklist.matches("Token"));
    }

    #[test]
    fn test_redacts_matching_keys() {
        let blacklist = Blacklist::default_pattern();
        let mut value = json!({ "user": "alice", "password": "hunter2" });
        blacklist.redact(&mut value);

        assert_eq!(value["user"], "alice");
        assert_eq!(value["password"], REDACTED);
    }

    #[test]
    fn test_redacts_nested_records() {
        let blacklist = Blacklist::default_pattern();
        let mut value = json!({
            "request": { "auth": { "token": "abc123" } },
            "items": [{ "password": "x" }, { "name": "ok" }],
        });
        blacklist.redact(&mut value);

        assert_eq!(value["request"]["auth"]["token"], REDACTED);
        assert_eq!(value["items"][0]["password"], REDACTED);
        assert_eq!(value["items"][1]["name"], "ok");
    }

    #[test]
    fn test_redacts_non_string_values() {
        let blacklist = Blacklist::default_pattern();
        let mut value = json!({ "token": { "nested": "whole object goes" } });
        blacklist.redact(&mut value);

        assert_eq!(value["token"], REDACTED);
    }

    #[test]
    fn test_custom_pattern() {
        let blacklist = Blacklist::new("spader").expect("valid pattern");
        let mut value = json!({ "james": "1", "spader": "2" });
        blacklist.redact(&mut value);

        assert_eq!(value["james"], "1");
        assert_eq!(value["spader"], REDACTED);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(Blacklist::new("(unclosed").is_err());
    }

    #[test]
    fn test_scalars_pass_through() {
        let blacklist = Blacklist::default_pattern();
        let mut value = json!("just text");
        blacklist.redact(&mut value);
        assert_eq!(value, json!("just text"));
    }
}
