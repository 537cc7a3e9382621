//! Error types for the person API client.
//!
//! # Design
//! `ApiError` classifies what went wrong on the wire: transport failures,
//! non-2xx statuses (with dedicated variants for 401, 404 and 500) and
//! payloads that do not match the expected envelope. `FetchError` is what the
//! resource functions return: a fixed, user-facing message per operation
//! that keeps the `ApiError` as its source for logging.

use thiserror::Error;

/// Wire-level failures produced by `PersonClient` and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, the requested person does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 401.
    #[error("unauthorized: {body}")]
    Unauthorized { body: String },

    /// The server returned 500.
    #[error("internal server error: {body}")]
    ServerError { body: String },

    /// The server returned any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS or I/O failure before a response was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// Rejected before any I/O, e.g. an empty identifier.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// HTTP status behind this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::ServerError { .. } => Some(500),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The resource operation a `FetchError` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Detail,
    Create,
    Update,
    Delete,
    BatchDelete,
}

impl Operation {
    pub fn user_message(&self) -> &'static str {
        match self {
            Operation::List => "failed to fetch person list, try again later",
            Operation::Detail => "failed to fetch person detail, try again later",
            Operation::Create => "failed to create person, try again later",
            Operation::Update => "failed to update person, try again later",
            Operation::Delete => "failed to delete person, try again later",
            Operation::BatchDelete => "failed to batch delete persons, try again later",
        }
    }
}

/// Returned by every `PersonApi` operation. Displays the operation's fixed
/// message; the underlying `ApiError` is available through `source()`.
#[derive(Debug, Error)]
#[error("{}", .operation.user_message())]
pub struct FetchError {
    pub operation: Operation,
    #[source]
    pub(crate) source: ApiError,
}

impl FetchError {
    pub fn new(operation: Operation, source: ApiError) -> Self {
        Self { operation, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.source, ApiError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.source, ApiError::Unauthorized { .. })
    }
}
