//! Domain DTOs for the product catalog API.
//!
//! # Design
//! The catalog owns the product schema; this crate only needs the numeric id
//! to address a product. Every other field is carried as untyped JSON so new
//! server-side attributes pass through without a client release.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Numeric product identifier assigned by the catalog.
pub type ProductId = u64;

/// A catalog item.
///
/// `id` is absent until the catalog has persisted the product. All remaining
/// attributes live in `fields` and are flattened into the JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
