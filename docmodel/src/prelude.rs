//! Convenient re-exports of commonly used types from docmodel.
//!
//! ```ignore
//! use docmodel::prelude::*;
//! ```
//!
//! This provides access to:
//! - The `Model` trait and its derive macro
//! - Property slots and the value protocol
//! - Containers and blobs
//! - Documents, the database and store backends
//! - Error types

pub use docmodel_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    blob::Blob,
    container::{MutableArray, MutableDictionary, Value},
    database::{ConcurrencyControl, Database, DatabaseBuilder},
    document::MutableDocument,
    error::{DocumentStoreError, DocumentStoreResult},
    model::{Model, ModelBase},
    property::Property,
    value::{PropertyValue, ValueKind},
};
pub use docmodel_macros::Model;
