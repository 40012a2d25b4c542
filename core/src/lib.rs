//! Asynchronous client for a remote product catalog API.
//!
//! # Overview
//! `CatalogClient` exposes list, create, create-with-binary-payload, update,
//! delete and a connectivity probe as futures. Any failure, whatever its
//! cause, reaches the caller as `CatalogError::RequestFailed`; the detail goes
//! to the injected `RequestObserver` instead.
//!
//! # Design
//! - `ProductApi` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - `Transport` is the I/O seam. `ReqwestTransport` is the production
//!   implementation; tests inject stubs.
//! - Products carry an optional numeric id and otherwise untyped JSON fields.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observe;
pub mod payload;
pub mod transport;
pub mod types;

pub use api::ProductApi;
pub use client::CatalogClient;
pub use config::ClientConfig;
pub use error::{ApiError, CatalogError, TransportError, REQUEST_FAILED_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
pub use observe::{Operation, RequestObserver, TracingObserver};
pub use payload::{BinaryPayload, FilePart, PartContent, PayloadPart};
pub use transport::ReqwestTransport;
pub use types::{Product, ProductId};
