//! Binary attachments stored inline in a container.

use bson::{Binary, Bson, Document, spec::BinarySubtype};
use serde::{Deserialize, Serialize};

/// A binary payload tagged with its content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    content_type: String,
    content: Vec<u8>,
}

impl Blob {
    /// Content type used when none is known.
    pub const OCTET_STREAM: &'static str = "application/octet-stream";

    const TYPE_KEY: &'static str = "@type";
    const TYPE_NAME: &'static str = "blob";

    pub fn new(content_type: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn length(&self) -> usize {
        self.content.len()
    }

    /// Plain-document form: `{"@type": "blob", "content_type", "length", "data"}`.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();

        document.insert(Self::TYPE_KEY, Self::TYPE_NAME);
        document.insert("content_type", self.content_type.clone());
        document.insert("length", self.length() as i64);
        document.insert(
            "data",
            Binary {
                subtype: BinarySubtype::Generic,
                bytes: self.content.clone(),
            },
        );

        document
    }

    /// Recognizes the plain-document form produced by [`Blob::to_document`].
    ///
    /// Returns `None` for any other document, which then reads as an ordinary dictionary.
    pub fn from_document(document: &Document) -> Option<Blob> {
        match document.get(Self::TYPE_KEY) {
            Some(Bson::String(name)) if name == Self::TYPE_NAME => {}
            _ => return None,
        }

        let content_type = match document.get("content_type") {
            Some(Bson::String(content_type)) => content_type.clone(),
            _ => Self::OCTET_STREAM.to_string(),
        };

        match document.get("data") {
            Some(Bson::Binary(binary)) => Some(Blob::new(content_type, binary.bytes.clone())),
            _ => None,
        }
    }
}
