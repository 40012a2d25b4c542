//! Stateless HTTP request builder and response parser for the product API.
//!
//! # Design
//! `ProductApi` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `CatalogClient` runs the round-trip in between; tests can drive both
//! halves directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::payload::BinaryPayload;
use crate::types::{Product, ProductId};

const APPLICATION_JSON: &str = "application/json";

/// Synchronous, stateless request builder for the product collection at
/// `base_url`.
#[derive(Debug, Clone)]
pub struct ProductApi {
    base_url: String,
}

impl ProductApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/{id}", self.base_url)
    }

    pub fn build_test_connection(&self) -> HttpRequest {
        self.build_list_products()
    }

    pub fn build_list_products(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.base_url.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_product(&self, product: &Product) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.base_url.clone(),
            headers: vec![("content-type".to_string(), APPLICATION_JSON.to_string())],
            body: Some(json_body(product)?),
        })
    }

    /// POST a multipart form. No Content-Type is set here; the transport
    /// supplies it together with the boundary.
    pub fn build_create_product_with_payload(&self, payload: BinaryPayload) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: self.base_url.clone(),
            headers: vec![("accept".to_string(), APPLICATION_JSON.to_string())],
            body: Some(RequestBody::Multipart(payload)),
        }
    }

    pub fn build_update_product(
        &self,
        id: ProductId,
        product: &Product,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            url: self.product_url(id),
            headers: vec![("content-type".to_string(), APPLICATION_JSON.to_string())],
            body: Some(json_body(product)?),
        })
    }

    pub fn build_delete_product(&self, id: ProductId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.product_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_test_connection(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_value(response)
    }

    /// An empty body (or JSON `null`) decodes to an empty list.
    pub fn parse_list_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let products: Option<Vec<Product>> = decode(&response.body)?;
        Ok(products.unwrap_or_default())
    }

    /// Parse the opaque response of a create, update or delete call.
    ///
    /// An empty body decodes to `Value::Null`.
    pub fn parse_value(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        decode(&response.body)
    }
}

fn json_body<T: Serialize>(value: &T) -> Result<RequestBody, ApiError> {
    let body =
        serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(RequestBody::Json(body))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map any non-2xx status to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
