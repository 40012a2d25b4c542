//! Asynchronous catalog client.
//!
//! # Design
//! `CatalogClient` pairs a `ProductApi` with an injected `Transport` and a
//! `RequestObserver`. Every operation goes through `dispatch`, which reports
//! to the observer and collapses any failure into
//! `CatalogError::RequestFailed`. Calls share no mutable state, so any number
//! can be in flight on clones of the same client.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::ProductApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, CatalogError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::observe::{Operation, RequestObserver, TracingObserver};
use crate::payload::BinaryPayload;
use crate::transport::ReqwestTransport;
use crate::types::{Product, ProductId};

#[derive(Clone)]
pub struct CatalogClient {
    api: ProductApi,
    transport: Arc<dyn Transport>,
    observer: Arc<dyn RequestObserver>,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a client for the product collection at `base_url` and fire a
    /// connectivity probe against it.
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self::with_observer(base_url, transport, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        base_url: &str,
        transport: Arc<dyn Transport>,
        observer: Arc<dyn RequestObserver>,
    ) -> Self {
        let client = Self {
            api: ProductApi::new(base_url),
            transport,
            observer,
        };
        info!(base_url = %client.api.base_url(), "catalog client initialized");
        client.spawn_probe();
        client
    }

    /// Client for `<api_url>/products` over `reqwest`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.products_url(), Arc::new(ReqwestTransport::new()))
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    /// The probe is handed to the transport before `new` returns, so it is
    /// always the first request. Its outcome only reaches the observer.
    fn spawn_probe(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                base_url = %self.api.base_url(),
                "no tokio runtime; skipping connectivity probe"
            );
            return;
        };
        let probe = self.dispatch(
            Operation::TestConnection,
            self.api.build_test_connection(),
            ProductApi::parse_test_connection,
        );
        runtime.spawn(async move {
            let _ = probe.await;
        });
    }

    pub async fn test_connection(&self) -> Result<Value, CatalogError> {
        self.dispatch(
            Operation::TestConnection,
            self.api.build_test_connection(),
            ProductApi::parse_test_connection,
        )
        .await
    }

    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        self.dispatch(
            Operation::List,
            self.api.build_list_products(),
            ProductApi::parse_list_products,
        )
        .await
    }

    pub async fn create(&self, product: &Product) -> Result<Value, CatalogError> {
        let request = self.prepared(Operation::Create, self.api.build_create_product(product))?;
        self.dispatch(Operation::Create, request, ProductApi::parse_value)
            .await
    }

    pub async fn create_with_binary_payload(
        &self,
        payload: BinaryPayload,
    ) -> Result<Value, CatalogError> {
        self.dispatch(
            Operation::CreateWithBinaryPayload,
            self.api.build_create_product_with_payload(payload),
            ProductApi::parse_value,
        )
        .await
    }

    pub async fn delete(&self, id: ProductId) -> Result<Value, CatalogError> {
        self.dispatch(
            Operation::Delete,
            self.api.build_delete_product(id),
            ProductApi::parse_value,
        )
        .await
    }

    pub async fn update(&self, id: ProductId, product: &Product) -> Result<Value, CatalogError> {
        let request =
            self.prepared(Operation::Update, self.api.build_update_product(id, product))?;
        self.dispatch(Operation::Update, request, ProductApi::parse_value)
            .await
    }

    fn prepared(
        &self,
        operation: Operation,
        built: Result<HttpRequest, ApiError>,
    ) -> Result<HttpRequest, CatalogError> {
        built.map_err(|err| self.fail(operation, &err))
    }

    fn fail(&self, operation: Operation, error: &ApiError) -> CatalogError {
        self.observer.on_failure(operation, error);
        CatalogError::RequestFailed
    }

    /// Hand `request` to the transport now and return a future resolving to
    /// the parsed result.
    fn dispatch<T, P>(
        &self,
        operation: Operation,
        request: HttpRequest,
        parse: P,
    ) -> impl Future<Output = Result<T, CatalogError>> + Send + 'static
    where
        T: fmt::Debug + Send + 'static,
        P: FnOnce(&ProductApi, HttpResponse) -> Result<T, ApiError> + Send + 'static,
    {
        self.observer.on_request(operation, &request);
        let pending = self.transport.execute(request);
        let client = self.clone();

        async move {
            let outcome = match pending.await {
                Ok(response) => parse(&client.api, response),
                Err(err) => Err(ApiError::from(err)),
            };
            match outcome {
                Ok(result) => {
                    client.observer.on_success(operation, &result);
                    Ok(result)
                }
                Err(err) => Err(client.fail(operation, &err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::future::{self, BoxFuture, FutureExt};
    use serde_json::json;

    use super::*;
    use crate::error::{TransportError, REQUEST_FAILED_MESSAGE};
    use crate::http::{HttpMethod, RequestBody};
    use crate::payload::FilePart;

    const BASE_URL: &str = "http://catalog.test/api/products";

    type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

    /// Records every request and answers from a closure.
    struct StubTransport {
        requests: Mutex<Vec<HttpRequest>>,
        respond: Box<Responder>,
    }

    impl StubTransport {
        fn new(
            respond: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError>
                + Send
                + Sync
                + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            })
        }

        fn replying(status: u16, body: &'static str) -> Arc<Self> {
            Self::new(move |_| Ok(reply(status, body)))
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for StubTransport {
        fn execute(
            &self,
            request: HttpRequest,
        ) -> BoxFuture<'static, Result<HttpResponse, TransportError>> {
            let result = (self.respond)(&request);
            self.requests.lock().unwrap().push(request);
            future::ready(result).boxed()
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Request(Operation),
        Success(Operation),
        Failure(Operation, Option<u16>),
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl RequestObserver for RecordingObserver {
        fn on_request(&self, operation: Operation, _request: &HttpRequest) {
            self.events.lock().unwrap().push(Event::Request(operation));
        }

        fn on_success(&self, operation: Operation, _result: &dyn fmt::Debug) {
            self.events.lock().unwrap().push(Event::Success(operation));
        }

        fn on_failure(&self, operation: Operation, error: &ApiError) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Failure(operation, error.status()));
        }
    }

    fn reply(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn widget() -> Product {
        Product::new().with_field("name", "Widget").with_field("price", 3)
    }

    /// Everything after the construction probe.
    fn caller_requests(transport: &StubTransport) -> Vec<HttpRequest> {
        transport.requests().into_iter().skip(1).collect()
    }

    #[tokio::test]
    async fn construction_probes_base_url_first() {
        let transport = StubTransport::replying(200, "[]");
        let client = CatalogClient::new(BASE_URL, transport.clone());

        let probe = transport.requests();
        assert_eq!(probe.len(), 1);
        assert_eq!(probe[0].method, HttpMethod::Get);
        assert_eq!(probe[0].url, BASE_URL);

        client.delete(5).await.unwrap();
        let all = transport.requests();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].method, HttpMethod::Get);
        assert_eq!(all[1].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn failed_probe_does_not_affect_later_calls() {
        let transport = StubTransport::new(|req| match req.method {
            HttpMethod::Get => Err(TransportError::new("connection refused")),
            _ => Ok(reply(201, r#"{"id":1}"#)),
        });
        let client = CatalogClient::new(BASE_URL, transport.clone());

        let created = client.create(&widget()).await.unwrap();
        assert_eq!(created, json!({"id": 1}));
    }

    #[test]
    fn construction_without_runtime_skips_probe() {
        let transport = StubTransport::replying(200, "[]");
        let _client = CatalogClient::new(BASE_URL, transport.clone());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_connection_returns_raw_body() {
        let transport = StubTransport::replying(200, r#"[{"id":1,"name":"Widget"}]"#);
        let client = CatalogClient::new(BASE_URL, transport.clone());

        let value = client.test_connection().await.unwrap();
        assert_eq!(value, json!([{"id": 1, "name": "Widget"}]));
        let requests = caller_requests(&transport);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].url, BASE_URL);
    }

    #[tokio::test]
    async fn list_returns_products_unchanged() {
        let transport = StubTransport::replying(200, r#"[{"id":1,"name":"Widget"}]"#);
        let client = CatalogClient::new(BASE_URL, transport);

        let products = client.list().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(
            serde_json::to_value(&products).unwrap(),
            json!([{"id": 1, "name": "Widget"}])
        );
    }

    #[tokio::test]
    async fn list_empty_body_is_empty_catalog() {
        let transport = StubTransport::replying(200, "");
        let client = CatalogClient::new(BASE_URL, transport);

        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_posts_json_product() {
        let transport = StubTransport::replying(201, r#"{"id":10,"name":"Widget","price":3}"#);
        let client = CatalogClient::new(BASE_URL, transport.clone());

        let response = client.create(&widget()).await.unwrap();
        assert_eq!(response, json!({"id": 10, "name": "Widget", "price": 3}));

        let req = &caller_requests(&transport)[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, BASE_URL);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let Some(RequestBody::Json(body)) = &req.body else {
            panic!("expected JSON body, got {:?}", req.body);
        };
        let sent: Product = serde_json::from_str(body).unwrap();
        assert_eq!(sent, widget());
    }

    #[tokio::test]
    async fn create_with_binary_payload_posts_multipart() {
        let transport = StubTransport::replying(201, r#"{"id":11}"#);
        let client = CatalogClient::new(BASE_URL, transport.clone());
        let payload = BinaryPayload::from_product(&widget())
            .file("image", FilePart::new(vec![0xff, 0xd8]).file_name("w.jpg"));

        let response = client
            .create_with_binary_payload(payload.clone())
            .await
            .unwrap();
        assert_eq!(response, json!({"id": 11}));

        let req = &caller_requests(&transport)[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, BASE_URL);
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.header("content-type").is_none());
        assert_eq!(req.body, Some(RequestBody::Multipart(payload)));
    }

    #[tokio::test]
    async fn update_puts_to_product_url() {
        let transport = StubTransport::replying(200, r#"{"id":4,"name":"Gadget"}"#);
        let client = CatalogClient::new(BASE_URL, transport.clone());
        let product = Product::new().with_id(4).with_field("name", "Gadget");

        let response = client.update(4, &product).await.unwrap();
        assert_eq!(response, json!({"id": 4, "name": "Gadget"}));

        let req = &caller_requests(&transport)[0];
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, format!("{BASE_URL}/4"));
        let Some(RequestBody::Json(body)) = &req.body else {
            panic!("expected JSON body, got {:?}", req.body);
        };
        let sent: Product = serde_json::from_str(body).unwrap();
        assert_eq!(sent, product);
    }

    #[tokio::test]
    async fn delete_targets_product_url_without_body() {
        let transport = StubTransport::replying(204, "");
        let client = CatalogClient::new(BASE_URL, transport.clone());

        let response = client.delete(5).await.unwrap();
        assert_eq!(response, Value::Null);

        let req = &caller_requests(&transport)[0];
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, format!("{BASE_URL}/5"));
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn delete_not_found_yields_generic_failure() {
        let transport = StubTransport::new(|req| match req.method {
            HttpMethod::Delete => Ok(reply(404, r#"{"detail":"product 5 not found"}"#)),
            _ => Ok(reply(200, "[]")),
        });
        let client = CatalogClient::new(BASE_URL, transport);

        let err = client.delete(5).await.unwrap_err();
        assert_eq!(err, CatalogError::RequestFailed);
        assert_eq!(err.to_string(), REQUEST_FAILED_MESSAGE);
        assert!(!err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn every_operation_collapses_failures() {
        for status in [400, 404, 409, 500, 503] {
            let transport = StubTransport::new(move |_| Ok(reply(status, "boom")));
            let client = CatalogClient::new(BASE_URL, transport);

            let results = [
                client.test_connection().await.err(),
                client.list().await.err(),
                client.create(&widget()).await.err(),
                client
                    .create_with_binary_payload(BinaryPayload::new().text("name", "x"))
                    .await
                    .err(),
                client.delete(1).await.err(),
                client.update(1, &widget()).await.err(),
            ];
            for result in results {
                assert_eq!(result, Some(CatalogError::RequestFailed), "status {status}");
            }
        }
    }

    #[tokio::test]
    async fn transport_errors_collapse() {
        let transport = StubTransport::new(|_| Err(TransportError::new("timed out")));
        let client = CatalogClient::new(BASE_URL, transport);

        assert_eq!(client.list().await.unwrap_err(), CatalogError::RequestFailed);
        assert_eq!(client.delete(2).await.unwrap_err(), CatalogError::RequestFailed);
    }

    #[tokio::test]
    async fn malformed_success_body_collapses() {
        let transport = StubTransport::replying(200, "<html>oops</html>");
        let client = CatalogClient::new(BASE_URL, transport);

        assert_eq!(client.list().await.unwrap_err(), CatalogError::RequestFailed);
        assert_eq!(
            client.create(&widget()).await.unwrap_err(),
            CatalogError::RequestFailed
        );
    }

    #[tokio::test]
    async fn observer_sees_detail_caller_does_not() {
        let transport = StubTransport::new(|req| match req.method {
            HttpMethod::Get => Ok(reply(200, "[]")),
            _ => Ok(reply(500, "database down")),
        });
        let observer = Arc::new(RecordingObserver::default());
        let client = CatalogClient::with_observer(BASE_URL, transport, observer.clone());

        client.list().await.unwrap();
        let err = client.update(3, &widget()).await.unwrap_err();
        assert_eq!(err, CatalogError::RequestFailed);

        let events: Vec<Event> = observer
            .events()
            .into_iter()
            .filter(|event| {
                !matches!(
                    event,
                    Event::Request(Operation::TestConnection)
                        | Event::Success(Operation::TestConnection)
                )
            })
            .collect();
        assert_eq!(
            events,
            vec![
                Event::Request(Operation::List),
                Event::Success(Operation::List),
                Event::Request(Operation::Update),
                Event::Failure(Operation::Update, Some(500)),
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let transport = StubTransport::new(|req| match req.method {
            HttpMethod::Delete => Ok(reply(404, "")),
            HttpMethod::Get => Ok(reply(200, r#"[{"id":1}]"#)),
            _ => Ok(reply(200, r#"{"ok":true}"#)),
        });
        let client = CatalogClient::new(BASE_URL, transport);
        let product = widget();

        let (listed, deleted, updated) = tokio::join!(
            client.list(),
            client.delete(9),
            client.update(1, &product)
        );
        assert_eq!(listed.unwrap().len(), 1);
        assert_eq!(deleted.unwrap_err(), CatalogError::RequestFailed);
        assert_eq!(updated.unwrap(), json!({"ok": true}));
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<CatalogClient>();
    }
}
