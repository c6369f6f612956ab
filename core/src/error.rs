//! Error types for the harness.
//!
//! # Design
//! Transport failures and violated expectations are kept apart: a
//! `TransportError` means the request never produced a response, while an
//! `AssertionFailure` means a response arrived but did not look right. Both
//! fold into `HarnessError` so a scenario can use `?` end to end.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpMethod;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// The network round trip could not complete (DNS, refused connection,
/// timeout, broken stream).
#[derive(Debug, Error)]
#[error("{method} {url} failed: {source}")]
pub struct TransportError {
    pub method: HttpMethod,
    pub url: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// A response did not meet an expectation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssertionFailure {
    #[error("expected status code {expected}, got {actual}")]
    Status { expected: u16, actual: u16 },

    /// The body is not JSON; `body` holds a decoded excerpt.
    #[error("response body is not valid JSON ({reason}): {body}")]
    NotJson { reason: String, body: String },

    #[error("expected a JSON {expected}, got {actual}")]
    UnexpectedShape {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{message}: `{field}` is missing from the response")]
    FieldMissing { message: String, field: String },

    #[error("{message}: expected `{field}` to be {expected}, got {actual}")]
    FieldMismatch {
        message: String,
        field: String,
        expected: Value,
        actual: Value,
    },

    #[error("item {index}: expected `{field}` to be {expected}, got {actual}")]
    ItemMismatch {
        index: usize,
        field: String,
        expected: Value,
        actual: Value,
    },

    #[error("item {index}: `{field}` is missing")]
    ItemFieldMissing { index: usize, field: String },

    #[error("missing keys in JSON response: {}", .missing.join(", "))]
    MissingKeys { missing: Vec<String> },

    #[error("expected header `{name}` not found")]
    HeaderMissing { name: String },

    #[error("expected header `{name}` to be {expected:?}, got {actual:?}")]
    HeaderMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("expected content type {expected:?}, got {actual:?}")]
    ContentType {
        expected: String,
        actual: Option<String>,
    },
}

/// Crate-level error returned by dispatching and by scenarios.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    /// The request descriptor could not be resolved into a request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A payload value did not serialize to a JSON object.
    #[error("invalid payload: {0}")]
    Payload(String),
}
