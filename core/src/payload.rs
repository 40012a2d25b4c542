//! Multipart payload for product uploads that carry binary content.
//!
//! # Design
//! `BinaryPayload` is plain data: an ordered list of named parts. It is not
//! tied to any HTTP library so requests stay inspectable in tests; the
//! transport converts it to its own multipart representation and picks the
//! boundary.

use serde_json::Value;

use crate::types::Product;

/// Ordered multipart form content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryPayload {
    parts: Vec<PayloadPart>,
}

/// One named part of a `BinaryPayload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPart {
    pub name: String,
    pub content: PartContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    Text(String),
    File(FilePart),
}

/// Binary content of a file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl FilePart {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl BinaryPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a form with every field of `product`.
    ///
    /// String values are sent verbatim; any other JSON value is sent as its
    /// JSON text. The id is included when present.
    pub fn from_product(product: &Product) -> Self {
        let mut payload = Self::new();
        if let Some(id) = product.id {
            payload = payload.text("id", id.to_string());
        }
        for (name, value) in &product.fields {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            payload = payload.text(name.clone(), text);
        }
        payload
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(PayloadPart {
            name: name.into(),
            content: PartContent::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.parts.push(PayloadPart {
            name: name.into(),
            content: PartContent::File(file),
        });
        self
    }

    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<PayloadPart> {
        self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
