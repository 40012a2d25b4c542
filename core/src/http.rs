//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `ProductApi` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network; a
//! `Transport` implementation performs the actual I/O. Tests substitute a
//! stub transport and inspect the requests it receives.

use std::fmt;

use futures::future::BoxFuture;

use crate::error::TransportError;
use crate::payload::BinaryPayload;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body variants the catalog API accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized JSON document.
    Json(String),
    /// Multipart form. The transport sets the Content-Type and boundary.
    Multipart(BinaryPayload),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes `HttpRequest`s against the network.
///
/// Any response the server produced, including 4xx/5xx, is returned as
/// `Ok`. Only failures to obtain a response at all are `Err`.
///
/// Requests are handed over in the order `execute` is called, not the order
/// their futures are first polled.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest)
        -> BoxFuture<'static, Result<HttpResponse, TransportError>>;
}
