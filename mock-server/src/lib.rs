use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub type Fields = Map<String, Value>;

#[derive(Debug, Default)]
pub struct Catalog {
    next_id: u64,
    products: BTreeMap<u64, Fields>,
}

impl Catalog {
    fn insert(&mut self, mut fields: Fields) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        fields.insert("id".to_string(), json!(id));
        self.products.insert(id, fields.clone());
        Value::Object(fields)
    }
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Catalog::default()));
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_products(State(db): State<Db>) -> Json<Vec<Value>> {
    let catalog = db.read().await;
    Json(catalog.products.values().cloned().map(Value::Object).collect())
}

/// Accepts either a JSON object or a multipart form.
async fn create_product(
    State(db): State<Db>,
    request: Request,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let fields = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| rejection.status())?;
        read_form(multipart).await?
    } else {
        let Json(fields) = Json::<Fields>::from_request(request, &())
            .await
            .map_err(|rejection| rejection.status())?;
        fields
    };

    let product = db.write().await.insert(fields);
    info!(%product, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Text fields become strings; file parts are summarised by name, type and
/// size.
async fn read_form(mut multipart: Multipart) -> Result<Fields, StatusCode> {
    let mut fields = Fields::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| err.status())?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = match field.file_name().map(str::to_owned) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(|err| err.status())?;
                json!({
                    "file_name": file_name,
                    "content_type": content_type,
                    "size": data.len(),
                })
            }
            None => Value::String(field.text().await.map_err(|err| err.status())?),
        };
        fields.insert(name, value);
    }
    Ok(fields)
}

/// Merges the submitted fields into the stored product. The path id wins
/// over any id in the body.
async fn update_product(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<Fields>,
) -> Result<Json<Value>, StatusCode> {
    let mut catalog = db.write().await;
    let product = catalog.products.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    for (name, value) in input {
        product.insert(name, value);
    }
    product.insert("id".to_string(), json!(id));
    Ok(Json(Value::Object(product.clone())))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut catalog = db.write().await;
    catalog
        .products
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
