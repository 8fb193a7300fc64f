//! Typed models over live, schemaless document storage.
//!
//! This crate is the primary entry point of docmodel. It re-exports the core types, the
//! `#[derive(Model)]` macro and the bundled storage backends.
//!
//! A model is a struct whose fields are [`Property`](property::Property) slots bound to keys of
//! one shared [`MutableDictionary`](container::MutableDictionary). Reading a property reads the
//! dictionary, writing one writes the dictionary, and nested models or arrays of models are
//! views into the same storage rather than copies.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmodel::{prelude::*, memory::InMemoryStore};
//!
//! #[derive(Clone, Model)]
//! pub struct Address {
//!     base: ModelBase,
//!     pub street: Property<Option<String>>,
//! }
//!
//! #[derive(Clone, Model)]
//! pub struct Person {
//!     base: ModelBase,
//!     pub name: Property<Option<String>>,
//!     pub address: Property<Option<Address>>,
//!     #[property(default = Vec::<Person>::new())]
//!     pub contacts: Property<Vec<Person>>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let database = Database::new(InMemoryStore::new());
//!
//!     let person = Person::with_document(MutableDocument::new());
//!     person.name.set(Some("Daniel".to_string()));
//!
//!     let address = Address::new();
//!     address.street.set(Some("1 Main Street".to_string()));
//!     person.address.set(Some(address));
//!
//!     let james = Person::new();
//!     james.name.set(Some("James".to_string()));
//!     person.contacts.update(|contacts| contacts.push(james));
//!
//!     person.save(&database, ConcurrencyControl::default()).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing

#[allow(unused_extern_crates)]
extern crate self as docmodel;

pub mod prelude;

pub use docmodel_core::{
    backend, blob, container, database, document, error, model, property, value,
};

/// Derive macro for [`Model`](model::Model).
pub use docmodel_macros::Model;

// Re-exported so generated code and callers agree on the versions.
pub use bson;
pub use chrono;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docmodel_memory::{InMemoryStore, InMemoryStoreBuilder};
}
