//! Error types for the catalog client.
//!
//! # Design
//! Two layers. `ApiError` keeps everything needed to diagnose a failed call:
//! status, body, decode or transport detail. It is handed to the
//! `RequestObserver` and never returned from `CatalogClient`. Callers only
//! ever see `CatalogError::RequestFailed`, whose message is fixed and does not
//! distinguish a 404 from a 500 from a network outage.

use thiserror::Error;

/// Message carried by every failed `CatalogClient` call.
pub const REQUEST_FAILED_MESSAGE: &str = "Something bad happened; please try again later.";

/// Error returned to `CatalogClient` callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{}", REQUEST_FAILED_MESSAGE)]
    RequestFailed,
}

/// Detailed failure produced while building a request, executing it, or
/// parsing its response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response was obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure to obtain any response: connection refused, DNS, timeout, TLS,
/// or an unreadable body stream.
#[derive(Debug, Error)]
#[error("transport error: {source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}
