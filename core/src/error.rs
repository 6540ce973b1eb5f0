//! Error types for the Slab API client.
//!
//! # Design
//! Every operation funnels its failures into `ApiError`. Callers that only
//! care whether a call worked can branch on `is_err()`; the variants exist so
//! that logs and tests can tell a dead connection from a schema mismatch.
//! GraphQL-level errors keep the server's messages verbatim.

use thiserror::Error;

use crate::graphql::GraphqlError;

/// Errors returned by `Client` and its services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered `null` for a lookup by identifier.
    #[error("resource not found")]
    NotFound,

    /// The request never produced an HTTP response (DNS, connect, timeout, I/O).
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response carried a non-empty `errors` array.
    #[error("graphql request failed: {}", join_messages(.0))]
    GraphqlErrors(Vec<GraphqlError>),

    /// The response body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request variables could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A caller-supplied argument violates the operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
