//! Saving and loading documents through a storage backend.
//!
//! [`Database`] stores [`MutableDocument`]s as BSON documents in one collection of a
//! [`StoreBackend`]. Each stored value is an envelope `{ "rev": n, "body": {...} }`: the revision
//! sits next to the document's properties, never inside them, so every key of the body belongs to
//! the caller. [`ConcurrencyControl::FailOnConflict`] compares against that revision.
//!
//! # Example
//!
//! ```ignore
//! use docmodel::{prelude::*, memory::InMemoryStore};
//!
//! let database = Database::builder(InMemoryStore::new())
//!     .collection("people")
//!     .build();
//!
//! let document = MutableDocument::new();
//! document.dictionary().set_value("name", "Daniel");
//! assert!(database.save_document(&document, ConcurrencyControl::default()).await?);
//! ```

use bson::{Bson, Document, Uuid};
use mea::mutex::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    backend::StoreBackend,
    container::MutableDictionary,
    document::MutableDocument,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Envelope field holding the stored revision.
pub const REVISION_FIELD: &str = "rev";

/// Envelope field holding the document's properties.
pub const BODY_FIELD: &str = "body";

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "_default";

/// How a save treats a stored document that changed since this copy was loaded or saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcurrencyControl {
    /// Overwrite whatever is stored.
    #[default]
    LastWriteWins,
    /// Leave the stored document alone and report `false`.
    FailOnConflict,
}

/// Document persistence over a storage backend.
///
/// Saves through one `Database` are serialized, so the conflict check and the write of a save
/// cannot interleave with another save. Databases sharing a backend do not coordinate.
#[derive(Debug)]
pub struct Database<B: StoreBackend> {
    backend: B,
    collection: String,
    writes: Mutex<()>,
}

impl<B: StoreBackend> Database<B> {
    /// Creates a database over `backend` using the default collection.
    pub fn new(backend: B) -> Self {
        Self::builder(backend).build()
    }

    /// Creates a builder for configuring a database over `backend`.
    pub fn builder(backend: B) -> DatabaseBuilder<B> {
        DatabaseBuilder::new(backend)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Saves `document`, stamping it with the next revision.
    ///
    /// Returns `Ok(false)` without writing when `concurrency` is
    /// [`ConcurrencyControl::FailOnConflict`] and the stored revision differs from the document's.
    ///
    /// # Errors
    ///
    /// Returns the backend's error unchanged if reading or writing the document fails.
    pub async fn save_document(
        &self,
        document: &MutableDocument,
        concurrency: ConcurrencyControl,
    ) -> DocumentStoreResult<bool> {
        let id = *document.id();
        let _writing = self.writes.lock().await;

        let stored = self.stored_envelope(id).await?;
        let stored_revision = stored.as_ref().and_then(revision_of);

        if concurrency == ConcurrencyControl::FailOnConflict && stored_revision != document.revision() {
            tracing::debug!(
                %id,
                collection = %self.collection,
                stored = ?stored_revision,
                local = ?document.revision(),
                "save rejected by conflict"
            );
            return Ok(false);
        }

        let revision = stored_revision.unwrap_or(0) + 1;
        let mut envelope = Document::new();
        envelope.insert(REVISION_FIELD, revision);
        envelope.insert(BODY_FIELD, document.dictionary().to_document());
        let envelope = Bson::Document(envelope);

        match stored {
            Some(_) => {
                self.backend
                    .update_documents(vec![(id, envelope)], &self.collection)
                    .await?
            }
            None => {
                self.backend
                    .insert_documents(vec![(id, envelope)], &self.collection)
                    .await?
            }
        }

        document.set_revision(revision);
        tracing::debug!(%id, collection = %self.collection, revision, "saved document");

        Ok(true)
    }

    /// Loads the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored value is not a saved document.
    pub async fn document(&self, id: &Uuid) -> DocumentStoreResult<Option<MutableDocument>> {
        let Some(mut envelope) = self.stored_envelope(*id).await? else {
            return Ok(None);
        };

        let revision = revision_of(&envelope);
        let body = match envelope.remove(BODY_FIELD) {
            Some(Bson::Document(body)) => body,
            _ => {
                return Err(DocumentStoreError::InvalidDocument(format!(
                    "document {id} in collection {} has no {BODY_FIELD} document",
                    self.collection,
                )));
            }
        };

        Ok(Some(MutableDocument::from_parts(
            *id,
            MutableDictionary::from_document(body),
            revision,
        )))
    }

    /// Deletes the stored copy of `document`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the document is not stored or the delete fails.
    pub async fn delete_document(&self, document: &MutableDocument) -> DocumentStoreResult<()> {
        let _writing = self.writes.lock().await;

        self.backend
            .delete_documents(vec![*document.id()], &self.collection)
            .await?;

        tracing::debug!(id = %document.id(), collection = %self.collection, "deleted document");

        Ok(())
    }

    /// Shuts down the database and releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }

    async fn stored_envelope(&self, id: Uuid) -> DocumentStoreResult<Option<Document>> {
        let stored = self
            .backend
            .get_documents(vec![id], &self.collection)
            .await?;

        match stored.into_iter().next() {
            None => Ok(None),
            Some(Bson::Document(body)) => Ok(Some(body)),
            Some(other) => Err(DocumentStoreError::InvalidDocument(format!(
                "document {id} in collection {} is a {:?}, not a document",
                self.collection,
                other.element_type(),
            ))),
        }
    }
}

fn revision_of(envelope: &Document) -> Option<i64> {
    match envelope.get(REVISION_FIELD) {
        Some(Bson::Int64(revision)) => Some(*revision),
        Some(Bson::Int32(revision)) => Some(i64::from(*revision)),
        _ => None,
    }
}

/// Builder for [`Database`].
#[derive(Debug)]
pub struct DatabaseBuilder<B: StoreBackend> {
    backend: B,
    collection: String,
}

impl<B: StoreBackend> DatabaseBuilder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Sets the collection documents are stored in.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = name.into();
        self
    }

    pub fn build(self) -> Database<B> {
        Database {
            backend: self.backend,
            collection: self.collection,
            writes: Mutex::new(()),
        }
    }
}
