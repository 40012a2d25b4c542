//! Diagnostic hooks for catalog requests.
//!
//! `CatalogClient` reports every request start, success and failure to a
//! single `RequestObserver`. The default `TracingObserver` turns these into
//! structured `tracing` events.

use std::fmt;

use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::http::HttpRequest;

/// The logical catalog operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TestConnection,
    List,
    Create,
    CreateWithBinaryPayload,
    Delete,
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::TestConnection => "test_connection",
            Operation::List => "list",
            Operation::Create => "create",
            Operation::CreateWithBinaryPayload => "create_with_binary_payload",
            Operation::Delete => "delete",
            Operation::Update => "update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait RequestObserver: Send + Sync {
    /// Called once the request has been built, before it reaches the transport.
    fn on_request(&self, operation: Operation, request: &HttpRequest);

    /// Called with the decoded result of a successful call.
    fn on_success(&self, operation: Operation, result: &dyn fmt::Debug);

    /// Called with the full failure detail. The caller only receives
    /// `CatalogError::RequestFailed`.
    fn on_failure(&self, operation: Operation, error: &ApiError);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, operation: Operation, request: &HttpRequest) {
        info!(
            %operation,
            method = %request.method,
            url = %request.url,
            "sending catalog request"
        );
    }

    fn on_success(&self, operation: Operation, result: &dyn fmt::Debug) {
        debug!(%operation, ?result, "catalog request succeeded");
    }

    fn on_failure(&self, operation: Operation, error: &ApiError) {
        error!(
            %operation,
            status = ?error.status(),
            error = %error,
            "catalog request failed"
        );
    }
}
