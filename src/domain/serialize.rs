//! Entry serialization.
//!
//! Every log call passes through the serializer exactly once, before any
//! reporter sees it. Errors become plain records and pick up the
//! `"error"` tag; structured data is redacted against the blacklist;
//! plain text is untouched. Reporters never observe a raw error value.

use crate::domain::message::LogMessage;
use crate::domain::redact::Blacklist;
use crate::domain::tags::Tags;

/// The tag appended to serialized errors.
pub const ERROR_TAG: &str = "error";

/// Converts raw call payloads into reporter-ready entries.
#[derive(Debug, Clone)]
pub struct Serializer {
    blacklist: Blacklist,
    add_error_tag: bool,
}

impl Serializer {
    pub fn new(blacklist: Blacklist, add_error_tag: bool) -> Self {
        Serializer {
            blacklist,
            add_error_tag,
        }
    }

    /// Serialize one entry.
    ///
    /// - An error message becomes its plain record and, unless the tag is
    ///   already present or error tagging is disabled, appends `"error"`
    ///   to the call's tags. Tagging is decided here, at the top level,
    ///   and nowhere else; error records embedded inside structured data
    ///   are already plain records and never re-trigger it.
    /// - A structured message has blacklisted keys redacted, recursively.
    /// - Plain text passes through unchanged.
    ///
    /// Serialization is idempotent: feeding an already-serialized record
    /// back through produces the same record.
    pub fn serialize(&self, tags: &mut Tags, message: LogMessage) -> LogMessage {
        match message {
            LogMessage::Error(details) => {
                if self.add_error_tag && !tags.contains(ERROR_TAG) {
                    tags.push(ERROR_TAG);
                }
                LogMessage::Data(details.to_record())
            }
            LogMessage::Data(mut value) => {
                self.blacklist.redact(&mut value);
                LogMessage::Data(value)
            }
            text @ LogMessage::Text(_) => text,
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Serializer::new(Blacklist::default_pattern(), true)
    }
}
