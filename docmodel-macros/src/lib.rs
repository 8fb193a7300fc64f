//! Derive macro for docmodel's `Model` trait.
//!
//! `#[derive(Model)]` turns a struct of `Property<T>` fields plus one `ModelBase` field into a
//! model: it generates `impl Model` (binding every property to the base's dictionary) and
//! `impl PropertyValue` (so the model can itself be a property of another model).
//!
//! # Usage
//!
//! ```ignore
//! use docmodel::prelude::*;
//!
//! #[derive(Clone, Model)]
//! pub struct Account {
//!     base: ModelBase,
//!     #[property(key = "display_name")]
//!     pub name: Property<Option<String>>,
//!     #[property(default = 0, validator = |balance: &i64| *balance >= 0)]
//!     pub balance: Property<i64>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod codegen;
mod parse;

/// Derive the `Model` trait for a struct with named fields.
///
/// Exactly one field must have type `ModelBase`; every other field must be a `Property<T>`.
///
/// # Field Attributes
///
/// - `#[property(key = "name")]`: Dictionary key of the property; defaults to the field name
/// - `#[property(default = expr)]`: Value reported while the key holds nothing readable
/// - `#[property(validator = expr)]`: `Fn(&T) -> bool` that every `set` must pass
#[proc_macro_derive(Model, attributes(property))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match codegen::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
