//! Error values for the invoker and the JSON accessor.
//!
//! # Design
//! Nothing here is raised across the public boundary of `Invoker` or the
//! `json` helpers. Transport failures become an `ErrorResponse`, which looks
//! like any other response to the caller. `JsonPathError` stays internal to
//! path evaluation and is logged and collapsed to `None` by the accessors.

use std::borrow::Cow;

use thiserror::Error;

use crate::http::Response;

const DEFAULT_MESSAGE: &str = "Something went wrong while processing the request";

/// A failed invocation rendered as a response.
///
/// The body is always a single-key JSON object: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    status: u16,
    message: String,
}

impl ErrorResponse {
    /// An error with the default status 500.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_status(500, message)
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE)
    }
}

impl Response for ErrorResponse {
    fn status_code(&self) -> u16 {
        self.status
    }

    fn body(&self) -> Cow<'_, str> {
        // `Value`'s Display quotes and escapes the message.
        let message = serde_json::Value::String(self.message.clone());
        Cow::Owned(format!("{{\"error\": {message}}}"))
    }
}

impl From<ureq::Error> for ErrorResponse {
    fn from(err: ureq::Error) -> Self {
        ErrorResponse::new(err.to_string())
    }
}

/// Errors while parsing or evaluating a JSON path expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JsonPathError {
    #[error("empty path expression")]
    Empty,

    #[error("unexpected character {found:?} at offset {offset} in {path:?}")]
    Unexpected {
        path: String,
        offset: usize,
        found: char,
    },

    #[error("unterminated segment in {0:?}")]
    Unterminated(String),

    #[error("unsupported path operator {operator:?} in {path:?}")]
    Unsupported { path: String, operator: String },

    #[error("no value at {0}")]
    NotFound(String),

    #[error("value at {0} is not an object")]
    NotAnObject(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_500() {
        let err = ErrorResponse::new("Employee id required");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.body(), r#"{"error": "Employee id required"}"#);
    }

    #[test]
    fn explicit_status_is_kept() {
        let err = ErrorResponse::with_status(404, "Employee id not found");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Employee id not found");
        assert_eq!(err.body(), r#"{"error": "Employee id not found"}"#);
    }

    #[test]
    fn default_carries_generic_message() {
        let err = ErrorResponse::default();
        assert_eq!(err.status_code(), 500);
        assert_eq!(
            err.body(),
            r#"{"error": "Something went wrong while processing the request"}"#
        );
    }

    #[test]
    fn body_stays_valid_json_when_message_has_quotes() {
        let err = ErrorResponse::new(r#"bad "token" \ here"#);
        let parsed: serde_json::Value = serde_json::from_str(&err.body()).unwrap();
        assert_eq!(parsed["error"], r#"bad "token" \ here"#);
        assert_eq!(parsed.as_object().unwrap().len(), 1);
    }
}
