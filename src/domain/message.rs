//! Log message representation.
//!
//! A log call carries either plain text, a structured record, or an
//! error. Errors are captured into [`ErrorDetails`] at the call boundary
//! and later serialized into a plain record so every reporter sees the
//! same data shape.

use serde::Serialize;
use serde_json::{json, Value};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;

/// The payload of one log call.
#[derive(Debug, Clone, PartialEq)]
pub enum LogMessage {
    /// Plain text, passed through untouched.
    Text(String),
    /// Structured data, subject to blacklist redaction.
    Data(Value),
    /// A captured error, converted to a plain record during serialization.
    Error(ErrorDetails),
}

impl LogMessage {
    /// Capture an error as a log message.
    ///
    /// Errors carrying a [`ResponseError`] are recognized and serialized
    /// into the response-error record shape.
    pub fn error(err: &(dyn StdError + 'static)) -> Self {
        LogMessage::Error(ErrorDetails::capture(err))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogMessage::Error(_))
    }

    /// Borrow the structured record, if this is one.
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            LogMessage::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the text, if this is plain text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LogMessage::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for LogMessage {
    /// Text renders as-is, structured data as compact JSON, errors by
    /// their display text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMessage::Text(text) => f.write_str(text),
            LogMessage::Data(value) => write!(f, "{}", value),
            LogMessage::Error(details) => f.write_str(&details.message),
        }
    }
}

impl From<&str> for LogMessage {
    fn from(text: &str) -> Self {
        LogMessage::Text(text.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(text: String) -> Self {
        LogMessage::Text(text)
    }
}

impl From<Value> for LogMessage {
    fn from(value: Value) -> Self {
        LogMessage::Data(value)
    }
}

impl From<&Value> for LogMessage {
    fn from(value: &Value) -> Self {
        LogMessage::Data(value.clone())
    }
}

impl From<ErrorDetails> for LogMessage {
    fn from(details: ErrorDetails) -> Self {
        LogMessage::Error(details)
    }
}

/// Error information captured at the call site.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    /// The error's display text.
    pub message: String,
    /// Rendered cause chain, plus a backtrace when capture is enabled.
    pub stack: String,
    /// Present when the error is a [`ResponseError`].
    pub response: Option<ResponseError>,
}

impl ErrorDetails {
    /// Capture an error's message, cause chain, and response shape.
    pub fn capture(err: &(dyn StdError + 'static)) -> Self {
        ErrorDetails {
            message: err.to_string(),
            stack: render_stack(err),
            response: err.downcast_ref::<ResponseError>().cloned(),
        }
    }

    /// Render the plain record reporters receive.
    ///
    /// Response errors become
    /// `{ message: "Response Error: <code> <text>", statusCode, payload }`;
    /// everything else becomes `{ message, stack }`.
    pub fn to_record(&self) -> Value {
        match &self.response {
            Some(response) => json!({
                "message": response.to_string(),
                "statusCode": response.status_code,
                "payload": response.payload,
            }),
            None => json!({
                "message": self.message,
                "stack": self.stack,
            }),
        }
    }
}

/// An error carrying an HTTP-style response: status code, status text,
/// and a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseError {
    pub status_code: u16,
    pub status_text: String,
    pub payload: Value,
}

impl ResponseError {
    pub fn new(status_code: u16, status_text: impl Into<String>, payload: Value) -> Self {
        ResponseError {
            status_code,
            status_text: status_text.into(),
            payload,
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response Error: {} {}", self.status_code, self.status_text)
    }
}

impl StdError for ResponseError {}

/// Render an error into its record shape directly.
///
/// Useful for embedding error details inside a structured message; the
/// embedded record is already serialized and passes through dispatch
/// untouched.
///
/// # Example
/// ```
/// use logfan::error_value;
/// use serde_json::json;
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
/// let message = json!({ "step": "sync", "cause": error_value(&err) });
/// assert_eq!(message["cause"]["message"], "boom");
/// ```
pub fn error_value(err: &(dyn StdError + 'static)) -> Value {
    ErrorDetails::capture(err).to_record()
}

/// Render the cause chain, one cause per line, then append a backtrace
/// when the process has capture enabled (RUST_BACKTRACE).
fn render_stack(err: &(dyn StdError + 'static)) -> String {
    let mut stack = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        stack.push_str("\n    caused by: ");
        stack.push_str(&cause.to_string());
        source = cause.source();
    }
    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        stack.push('\n');
        stack.push_str(&backtrace.to_string());
    }
    stack
}
