//! Typed field slots bound to a model's dictionary.
//!
//! A [`Property<T>`] is created once per field when its model is constructed and keeps a handle
//! to the model's [`MutableDictionary`]. The first read materializes the value from the dictionary
//! (falling back to the declared default) and caches it; every later read is served from the cache.
//! Every accepted write goes straight through to the dictionary and replaces the cache.
//!
//! The cache is this slot's view of the field. Changes made to the dictionary by other means are
//! not noticed once the slot holds a value.
//!
//! # Example
//!
//! ```ignore
//! use docmodel::{container::MutableDictionary, property::Property};
//!
//! let dict = MutableDictionary::new();
//! let value = Property::<Option<i32>>::new(&dict, "value")
//!     .with_default(10)
//!     .with_validator(|v| v.unwrap_or(0) > 10);
//!
//! assert_eq!(value.get(), Some(10));
//! value.set(Some(5));                 // rejected, nothing changes
//! assert_eq!(value.get(), Some(10));
//! value.set(Some(11));
//! assert_eq!(dict.int("value"), Some(11));
//! ```

use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    container::MutableDictionary,
    value::PropertyValue,
};

/// Predicate a candidate value must satisfy before it is written.
pub type Validator<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A typed field stored under `key` in its model's dictionary.
///
/// Clones share the cache, so a cloned model is another handle to the same model.
pub struct Property<T: PropertyValue> {
    dictionary: MutableDictionary,
    key: String,
    default: Option<T>,
    validator: Option<Validator<T>>,
    cache: Arc<RwLock<Option<T>>>,
}

impl<T: PropertyValue> Property<T> {
    /// Creates a slot for `key`, bound to `dictionary`.
    pub fn new(dictionary: &MutableDictionary, key: impl Into<String>) -> Self {
        Self {
            dictionary: dictionary.clone(),
            key: key.into(),
            default: None,
            validator: None,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Value returned by reads while nothing compatible is stored under the key.
    ///
    /// The default is never written to the dictionary.
    pub fn with_default(mut self, default: impl Into<T>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Predicate every write must pass; failing writes are dropped without notice.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` once the slot has been read or written.
    pub fn is_cached(&self) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Reads the field.
    ///
    /// # Panics
    ///
    /// Panics if nothing compatible is stored, no default was declared and `T` cannot represent
    /// absence (i.e. it is not an `Option`).
    pub fn get(&self) -> T {
        if let Some(value) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return value.clone();
        }

        let value = T::from_dictionary(&self.dictionary, &self.key)
            .or_else(|| self.default.clone())
            .or_else(T::absent)
            .unwrap_or_else(|| {
                panic!(
                    "property `{}` has no value and no default, and {} cannot be absent",
                    self.key,
                    std::any::type_name::<T>(),
                )
            });

        tracing::trace!(key = %self.key, kind = ?T::KIND, "materialized property");

        *self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(value.clone());

        value
    }

    /// Writes the field through to the dictionary, unless the validator rejects it.
    ///
    /// Writing a value whose stored form is "nothing" (such as `None`) removes the key.
    pub fn set(&self, value: T) {
        if let Some(validator) = &self.validator {
            if !validator(&value) {
                tracing::debug!(key = %self.key, "validator rejected property write");
                return;
            }
        }

        match value.to_value() {
            Some(stored) => self.dictionary.set_value(self.key.as_str(), stored),
            None => {
                self.dictionary.remove(&self.key);
            }
        }

        *self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    /// Reads the field, applies `f` to it and writes the result back.
    ///
    /// Use this for in-place edits of collection fields, e.g. appending to an array of models.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }
}

impl<T: PropertyValue> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            dictionary: self.dictionary.clone(),
            key: self.key.clone(),
            default: self.default.clone(),
            validator: self.validator.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<T: PropertyValue + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("has_validator", &self.validator.is_some())
            .field("cached", &*self.cache.read().unwrap_or_else(PoisonError::into_inner))
            .finish()
    }
}
