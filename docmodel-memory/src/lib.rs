//! In-memory storage backend for docmodel.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait. It
//! uses an async-aware read-write lock for concurrent access and suits tests, development and
//! short-lived processes.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmodel::{prelude::*, memory::InMemoryStore};
//!
//! #[derive(Clone, Model)]
//! pub struct Person {
//!     base: ModelBase,
//!     pub name: Property<Option<String>>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!     let database = Database::new(backend);
//!
//!     let person = Person::with_document(MutableDocument::new());
//!     person.name.set(Some("Daniel".to_string()));
//!     person.save(&database, ConcurrencyControl::default()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
