//! Typed models bound live to mutable, schemaless documents.
//!
//! This crate is the core of the docmodel project and provides:
//!
//! - **Containers** ([`container`]) - Shared, mutable dictionaries and arrays of primitive values
//! - **Binding protocol** ([`value`]) - How scalars, options, arrays and models map onto containers
//! - **Properties** ([`property`]) - Per-field slots with defaults, validators and a read cache
//! - **Models** ([`model`]) - Typed views over a dictionary, nestable inside one another
//! - **Documents** ([`document`]) - Dictionaries with an identity in a database
//! - **Persistence** ([`database`], [`backend`]) - Saving documents under a concurrency policy
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use docmodel::prelude::*;
//!
//! #[derive(Clone, Model)]
//! pub struct Person {
//!     base: ModelBase,
//!     #[property(key = "name")]
//!     pub name: Property<Option<String>>,
//! }
//!
//! let person = Person::new();
//! assert_eq!(person.name.get(), None);
//!
//! person.name.set(Some("Daniel".to_string()));
//! assert_eq!(person.dictionary().to_document(), bson::doc! { "name": "Daniel" });
//! ```

pub mod backend;
pub mod blob;
pub mod container;
pub mod database;
pub mod document;
pub mod error;
pub mod model;
pub mod property;
pub mod value;
