//! Process-local storage for saved documents.
//!
//! Bodies are kept as BSON values in nested maps (collection, then document id) behind one
//! async-aware read-write lock, so every backend call is atomic with respect to the others.

use async_trait::async_trait;
use bson::{Bson, Uuid};
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};

use docmodel_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
};

type CollectionMap = HashMap<Uuid, Bson>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryStore` is cheap to clone: clones share the same underlying maps, so a store handed to
/// a [`Database`](docmodel_core::database::Database) can still be inspected through another handle.
///
/// # Example
///
/// ```ignore
/// use docmodel::memory::InMemoryStore;
/// use docmodel::backend::StoreBackend;
/// use bson::{Uuid, Bson, doc};
///
/// let store = InMemoryStore::new();
///
/// let id = Uuid::new();
/// store.insert_documents(vec![(id, Bson::Document(doc! { "name": "Daniel" }))], "people").await?;
///
/// let bodies = store.get_documents(vec![id], "people").await?;
/// assert_eq!(bodies.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates an empty store with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Number of documents stored in `collection`; zero if it doesn't exist.
    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let bodies = store.entry(collection.to_string()).or_default();

        if let Some((id, _)) = documents.iter().find(|(id, _)| bodies.contains_key(id)) {
            return Err(DocumentStoreError::DocumentAlreadyExists(
                id.to_string(),
                collection.to_string(),
            ));
        }

        tracing::trace!(collection, count = documents.len(), "inserting documents");
        bodies.extend(documents);

        Ok(())
    }

    async fn update_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let Some(bodies) = store.get_mut(collection) else {
            return Err(DocumentStoreError::CollectionNotFound(collection.to_string()));
        };

        if let Some((id, _)) = documents.iter().find(|(id, _)| !bodies.contains_key(id)) {
            return Err(DocumentStoreError::DocumentNotFound(
                id.to_string(),
                collection.to_string(),
            ));
        }

        tracing::trace!(collection, count = documents.len(), "updating documents");
        bodies.extend(documents);

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<Uuid>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let Some(bodies) = store.get_mut(collection) else {
            return Err(DocumentStoreError::CollectionNotFound(collection.to_string()));
        };

        if let Some(id) = ids.iter().find(|id| !bodies.contains_key(id)) {
            return Err(DocumentStoreError::DocumentNotFound(
                id.to_string(),
                collection.to_string(),
            ));
        }

        tracing::trace!(collection, count = ids.len(), "deleting documents");
        for id in &ids {
            bodies.remove(id);
        }

        Ok(())
    }

    async fn get_documents(
        &self,
        ids: Vec<Uuid>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(bodies) = store.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(ids
            .iter()
            .filter_map(|id| bodies.get(id).cloned())
            .collect())
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_default();

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        if self.store.write().await.remove(name).is_none() {
            return Err(DocumentStoreError::CollectionNotFound(name.to_string()));
        }

        tracing::debug!(collection = name, "dropped collection");

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names: Vec<String> = self.store.read().await.keys().cloned().collect();
        names.sort();

        Ok(names)
    }
}

/// Builder for [`InMemoryStore`].
///
/// ```ignore
/// use docmodel::{backend::StoreBackendBuilder, memory::InMemoryStore};
///
/// let store = InMemoryStore::builder()
///     .collection("people")
///     .build()
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStoreBuilder {
    collections: Vec<String>,
}

impl InMemoryStoreBuilder {
    /// Creates `name` up front, so it is listed before anything is saved into it.
    ///
    /// [`build`](StoreBackendBuilder::build) fails if a name is empty.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collections.push(name.into());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        if self.collections.iter().any(String::is_empty) {
            return Err(DocumentStoreError::Initialization(
                "collection names must not be empty".to_string(),
            ));
        }

        let store: StoreMap = self
            .collections
            .into_iter()
            .map(|name| (name, CollectionMap::new()))
            .collect();

        Ok(InMemoryStore {
            store: Arc::new(RwLock::new(store)),
        })
    }
}
