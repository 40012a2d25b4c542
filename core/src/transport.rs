//! `reqwest`-backed `Transport`.

use futures::future::{self, BoxFuture, FutureExt};
use reqwest::multipart::{Form, Part};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};
use crate::payload::{BinaryPayload, PartContent};

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Executes requests with a shared `reqwest::Client`.
///
/// Status codes are never treated as errors here; 4xx/5xx come back as
/// `HttpResponse` values for `ProductApi` to interpret.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn prepare(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        let builder = match request.body {
            None => builder,
            Some(RequestBody::Json(json)) => builder.body(json),
            Some(RequestBody::Multipart(payload)) => {
                builder.multipart(multipart_form(payload).map_err(TransportError::new)?)
            }
        };
        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'static, Result<HttpResponse, TransportError>> {
        let builder = match self.prepare(request) {
            Ok(builder) => builder,
            Err(err) => return future::ready(Err(err)).boxed(),
        };

        async move {
            let response = builder.send().await.map_err(TransportError::new)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.text().await.map_err(TransportError::new)?;
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
        .boxed()
    }
}

fn multipart_form(payload: BinaryPayload) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for part in payload.into_parts() {
        form = match part.content {
            PartContent::Text(value) => form.text(part.name, value),
            PartContent::File(file) => {
                let mut body = Part::bytes(file.data);
                if let Some(file_name) = file.file_name {
                    body = body.file_name(file_name);
                }
                if let Some(content_type) = file.content_type {
                    body = body.mime_str(&content_type)?;
                }
                form.part(part.name, body)
            }
        };
    }
    Ok(form)
}
