//! Typed models over a dictionary.
//!
//! A model is a struct of [`Property`](crate::property::Property) fields plus one [`ModelBase`],
//! which holds the dictionary every property is bound to and, for document-backed models, the
//! document to save. The base is fixed at construction.
//!
//! Models are usually declared with `#[derive(Model)]`, which builds every property against the
//! base's dictionary and makes the model usable as a nested field of another model:
//!
//! ```ignore
//! use docmodel::prelude::*;
//!
//! #[derive(Clone, Model)]
//! pub struct Person {
//!     base: ModelBase,
//!     #[property(key = "name")]
//!     pub name: Property<Option<String>>,
//!     #[property(key = "address")]
//!     pub address: Property<Option<Address>>,
//!     #[property(key = "contacts")]
//!     pub contacts: Property<Option<Vec<Person>>>,
//! }
//!
//! #[derive(Clone, Model)]
//! pub struct Address {
//!     base: ModelBase,
//!     pub street: Property<Option<String>>,
//! }
//!
//! let person = Person::new();
//! person.address.set(Some(Address::new()));
//! if let Some(address) = person.address.get() {
//!     address.street.set(Some("1 Main Street".to_string()));
//! }
//! assert_eq!(person.dictionary().to_document(), bson::doc! {
//!     "address": { "street": "1 Main Street" },
//! });
//! ```
//!
//! Nested models never copy data: reading a nested field wraps the child dictionary found under
//! the key, so writes through the child are writes into the parent.

use async_trait::async_trait;

use crate::{
    backend::StoreBackend,
    container::{MutableArray, MutableDictionary, Value},
    database::{ConcurrencyControl, Database},
    document::MutableDocument,
    error::DocumentStoreResult,
    value::PropertyValue,
};

/// The backing store of a model: its dictionary and, optionally, the document it belongs to.
#[derive(Debug, Clone, Default)]
pub struct ModelBase {
    dictionary: MutableDictionary,
    document: Option<MutableDocument>,
}

impl ModelBase {
    /// A base over an existing dictionary, with no document to save.
    pub fn from_dictionary(dictionary: MutableDictionary) -> Self {
        Self {
            dictionary,
            document: None,
        }
    }

    /// A base over a document's root dictionary.
    pub fn from_document(document: MutableDocument) -> Self {
        Self {
            dictionary: document.dictionary().clone(),
            document: Some(document),
        }
    }

    pub fn dictionary(&self) -> &MutableDictionary {
        &self.dictionary
    }

    pub fn document(&self) -> Option<&MutableDocument> {
        self.document.as_ref()
    }
}

/// A typed view over a dictionary.
///
/// Implementors only provide [`Model::from_base`] and [`Model::base`]; `#[derive(Model)]` writes
/// both. Cloning a model yields another handle to the same model: same dictionary, same property
/// caches. Two independent models over one dictionary only exist when built that way explicitly.
#[async_trait]
pub trait Model: PropertyValue {
    /// Wraps `base`, binding every property to its dictionary.
    fn from_base(base: ModelBase) -> Self;

    fn base(&self) -> &ModelBase;

    /// Creates a model over a new, empty, transient dictionary.
    fn new() -> Self {
        Self::from_base(ModelBase::default())
    }

    /// Wraps an existing dictionary without copying it.
    fn with_dictionary(dictionary: MutableDictionary) -> Self {
        Self::from_base(ModelBase::from_dictionary(dictionary))
    }

    /// Wraps a document so the model can later be saved.
    fn with_document(document: MutableDocument) -> Self {
        Self::from_base(ModelBase::from_document(document))
    }

    fn dictionary(&self) -> &MutableDictionary {
        self.base().dictionary()
    }

    fn document(&self) -> Option<&MutableDocument> {
        self.base().document()
    }

    /// Saves the model's document into `database`.
    ///
    /// Returns `Ok(false)` when [`ConcurrencyControl::FailOnConflict`] detects a conflicting save.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged if the write fails.
    ///
    /// # Panics
    ///
    /// Panics if the model was not constructed from a document; a transient dictionary has
    /// nothing to save.
    async fn save<B: StoreBackend>(
        &self,
        database: &Database<B>,
        concurrency: ConcurrencyControl,
    ) -> DocumentStoreResult<bool> {
        let Some(document) = self.document() else {
            panic!(
                "{} cannot be saved as it doesn't contain a document",
                std::any::type_name::<Self>()
            );
        };

        database
            .save_document(document, concurrency)
            .await
    }
}

/// Wraps the dictionary stored at `key` in a new `M`; `None` if there is no dictionary there.
pub fn nested_from_dictionary<M: Model>(dictionary: &MutableDictionary, key: &str) -> Option<M> {
    dictionary
        .dictionary(key)
        .map(M::with_dictionary)
}

/// Wraps the dictionary stored at `index` in a new `M`; `None` if there is no dictionary there.
pub fn nested_from_array<M: Model>(array: &MutableArray, index: usize) -> Option<M> {
    array
        .dictionary(index)
        .map(M::with_dictionary)
}

/// The stored form of a nested model: its own dictionary handle.
pub fn nested_to_value<M: Model>(model: &M) -> Option<Value> {
    Some(Value::Dictionary(model.dictionary().clone()))
}
