//! Mutable, reference-shared containers that back typed models.
//!
//! A [`MutableDictionary`] maps string keys to [`Value`]s and a [`MutableArray`] is its indexed
//! analogue. Both are cheap handles: cloning one aliases the same underlying storage, so a nested
//! dictionary handed to a child model is the very dictionary the parent holds.
//!
//! The typed getters (`int`, `double`, `date`, ...) own the coercion rules between stored
//! primitives. Missing keys, nulls, out-of-range indexes and incompatible kinds all read as `None`.
//!
//! # Example
//!
//! ```ignore
//! use docmodel::container::MutableDictionary;
//! use bson::doc;
//!
//! let dict = MutableDictionary::from_document(doc! { "name": "Daniel", "age": 41 });
//! assert_eq!(dict.string("name"), Some("Daniel".to_string()));
//! assert_eq!(dict.double("age"), Some(41.0));
//!
//! dict.set_value("age", 42);
//! assert_eq!(dict.to_document(), doc! { "name": "Daniel", "age": 42 });
//! ```

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    blob::Blob,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// A primitive value a container can hold directly.
///
/// `Dictionary` and `Array` carry shared handles, not copies.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Int32(i32),
    Int64(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    /// Kept at full precision in memory. Its BSON form, and so every saved copy, has millisecond
    /// precision.
    Date(DateTime<Utc>),
    Blob(Blob),
    Dictionary(MutableDictionary),
    Array(MutableArray),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Reads the value as a 32-bit integer, narrowing wider numbers with a truncating cast.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            Value::Int64(v) => Some(*v as i32),
            Value::Double(v) => Some(*v as i32),
            Value::Boolean(v) => Some(i32::from(*v)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            Value::Double(v) => Some(*v as i64),
            Value::Boolean(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(v) => Some(f64::from(*v)),
            Value::Int64(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Reads the value as a boolean. Numbers are `true` when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            Value::Int32(v) => Some(*v != 0),
            Value::Int64(v) => Some(*v != 0),
            Value::Double(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Reads the value as a timestamp, parsing RFC 3339 text when needed.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(v) => Some(*v),
            Value::String(v) => DateTime::parse_from_rfc3339(v)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Value::Blob(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&MutableDictionary> {
        match self {
            Value::Dictionary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&MutableArray> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Converts the value into its plain BSON form, deep-copying nested containers.
    ///
    /// Dates are truncated to whole milliseconds.
    pub fn to_bson(&self) -> Bson {
        match self {
            Value::Null => Bson::Null,
            Value::Int32(v) => Bson::Int32(*v),
            Value::Int64(v) => Bson::Int64(*v),
            Value::Double(v) => Bson::Double(*v),
            Value::Boolean(v) => Bson::Boolean(*v),
            Value::String(v) => Bson::String(v.clone()),
            Value::Date(v) => Bson::DateTime(bson::DateTime::from_chrono(*v)),
            Value::Blob(v) => Bson::Document(v.to_document()),
            Value::Dictionary(v) => Bson::Document(v.to_document()),
            Value::Array(v) => Bson::Array(v.to_vec()),
        }
    }

    /// Builds a value from plain BSON, allocating fresh containers for documents and arrays.
    pub fn from_bson(bson: Bson) -> Self {
        match bson {
            Bson::Null | Bson::Undefined => Value::Null,
            Bson::Int32(v) => Value::Int32(v),
            Bson::Int64(v) => Value::Int64(v),
            Bson::Double(v) => Value::Double(v),
            Bson::Boolean(v) => Value::Boolean(v),
            Bson::String(v) | Bson::Symbol(v) => Value::String(v),
            Bson::DateTime(v) => Value::Date(v.to_chrono()),
            Bson::ObjectId(v) => Value::String(v.to_hex()),
            Bson::Binary(v) => Value::Blob(Blob::new(Blob::OCTET_STREAM, v.bytes)),
            Bson::Document(doc) => match Blob::from_document(&doc) {
                Some(blob) => Value::Blob(blob),
                None => Value::Dictionary(MutableDictionary::from_document(doc)),
            },
            Bson::Array(values) => Value::Array(MutableArray::from_bson(values)),
            other => {
                tracing::trace!(element_type = ?other.element_type(), "unsupported bson value read as null");
                Value::Null
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => {
                a.ptr_eq(b) || a.to_document() == b.to_document()
            }
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b) || a.to_vec() == b.to_vec(),
            _ => false,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Blob> for Value {
    fn from(value: Blob) -> Self {
        Value::Blob(value)
    }
}

impl From<MutableDictionary> for Value {
    fn from(value: MutableDictionary) -> Self {
        Value::Dictionary(value)
    }
}

impl From<MutableArray> for Value {
    fn from(value: MutableArray) -> Self {
        Value::Array(value)
    }
}

type Entries = IndexMap<String, Value>;

/// A shared, insertion-ordered dictionary of [`Value`]s.
///
/// Every clone refers to the same entries. Use [`MutableDictionary::ptr_eq`] to tell whether two
/// handles alias one dictionary.
#[derive(Clone, Default)]
pub struct MutableDictionary {
    entries: Arc<RwLock<Entries>>,
}

impl MutableDictionary {
    /// Creates a new, empty, transient dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from a plain BSON document.
    ///
    /// Nested documents and arrays become nested containers owned by the new dictionary.
    pub fn from_document(document: Document) -> Self {
        let entries = document
            .into_iter()
            .map(|(key, value)| (key, Value::from_bson(value)))
            .collect::<Entries>();

        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Serializes `value` and builds a dictionary from the result.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or `value` does not serialize to a document.
    pub fn encode<T: Serialize>(value: &T) -> DocumentStoreResult<Self> {
        match serialize_to_bson(value)? {
            Bson::Document(document) => Ok(Self::from_document(document)),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "expected a document, got {:?}",
                other.element_type()
            ))),
        }
    }

    /// Deserializes the dictionary's current contents into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents do not match the shape of `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> DocumentStoreResult<T> {
        Ok(deserialize_from_bson(Bson::Document(self.to_document()))?)
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles refer to the same dictionary.
    pub fn ptr_eq(&self, other: &MutableDictionary) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.read()
            .keys()
            .cloned()
            .collect()
    }

    /// Returns `true` if the key is set, even when it holds null.
    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Returns the raw value stored at `key`.
    pub fn value(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        self.value(key).and_then(|v| v.as_i32())
    }

    pub fn int64(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(|v| v.as_i64())
    }

    pub fn double(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(|v| v.as_f64())
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(|v| v.as_bool())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.value(key)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.value(key).and_then(|v| v.as_date())
    }

    pub fn blob(&self, key: &str) -> Option<Blob> {
        self.value(key)
            .and_then(|v| v.as_blob().cloned())
    }

    /// Returns a handle to the nested dictionary stored at `key`.
    pub fn dictionary(&self, key: &str) -> Option<MutableDictionary> {
        self.value(key)
            .and_then(|v| v.as_dictionary().cloned())
    }

    /// Returns a handle to the nested array stored at `key`.
    pub fn array(&self, key: &str) -> Option<MutableArray> {
        self.value(key)
            .and_then(|v| v.as_array().cloned())
    }

    /// Stores `value` at `key`, replacing any previous value in place.
    pub fn set_value(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        self.write().insert(key, value);
    }

    /// Removes `key` and returns the value it held.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().shift_remove(key)
    }

    /// Replaces the whole contents with the entries of `document`.
    pub fn set_document(&self, document: Document) {
        let replacement = MutableDictionary::from_document(document);
        let entries = std::mem::take(&mut *replacement.write());

        *self.write() = entries;
    }

    /// Returns a plain, deep copy of the dictionary as a BSON document.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();

        for (key, value) in self.read().iter() {
            document.insert(key.clone(), value.to_bson());
        }

        document
    }

    /// Renders the dictionary as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be represented as JSON.
    pub fn to_json(&self) -> DocumentStoreResult<serde_json::Value> {
        Ok(serde_json::to_value(self.to_document())?)
    }
}

impl fmt::Debug for MutableDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.read().iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

/// A shared, ordered array of [`Value`]s.
#[derive(Clone, Default)]
pub struct MutableArray {
    values: Arc<RwLock<Vec<Value>>>,
}

impl MutableArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an array from plain BSON values.
    pub fn from_bson(values: Vec<Bson>) -> Self {
        values
            .into_iter()
            .map(Value::from_bson)
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles refer to the same array.
    pub fn ptr_eq(&self, other: &MutableArray) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns the raw value at `index`, or `None` past the end.
    pub fn value(&self, index: usize) -> Option<Value> {
        self.read().get(index).cloned()
    }

    pub fn int(&self, index: usize) -> Option<i32> {
        self.value(index).and_then(|v| v.as_i32())
    }

    pub fn int64(&self, index: usize) -> Option<i64> {
        self.value(index).and_then(|v| v.as_i64())
    }

    pub fn double(&self, index: usize) -> Option<f64> {
        self.value(index).and_then(|v| v.as_f64())
    }

    pub fn boolean(&self, index: usize) -> Option<bool> {
        self.value(index).and_then(|v| v.as_bool())
    }

    pub fn string(&self, index: usize) -> Option<String> {
        self.value(index)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn date(&self, index: usize) -> Option<DateTime<Utc>> {
        self.value(index).and_then(|v| v.as_date())
    }

    pub fn blob(&self, index: usize) -> Option<Blob> {
        self.value(index)
            .and_then(|v| v.as_blob().cloned())
    }

    pub fn dictionary(&self, index: usize) -> Option<MutableDictionary> {
        self.value(index)
            .and_then(|v| v.as_dictionary().cloned())
    }

    pub fn array(&self, index: usize) -> Option<MutableArray> {
        self.value(index)
            .and_then(|v| v.as_array().cloned())
    }

    pub fn append(&self, value: impl Into<Value>) {
        self.write().push(value.into());
    }

    /// Replaces the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_value(&self, index: usize, value: impl Into<Value>) {
        let mut values = self.write();
        let len = values.len();

        match values.get_mut(index) {
            Some(slot) => *slot = value.into(),
            None => panic!("array index {index} out of bounds (count {len})"),
        }
    }

    /// Inserts a value at `index`, shifting later values up.
    ///
    /// # Panics
    ///
    /// Panics if `index > count`.
    pub fn insert(&self, index: usize, value: impl Into<Value>) {
        self.write().insert(index, value.into());
    }

    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut values = self.write();

        (index < values.len()).then(|| values.remove(index))
    }

    /// Returns a plain, deep copy of the array as BSON values.
    pub fn to_vec(&self) -> Vec<Bson> {
        self.read()
            .iter()
            .map(Value::to_bson)
            .collect()
    }
}

impl FromIterator<Value> for MutableArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: Arc::new(RwLock::new(iter.into_iter().collect())),
        }
    }
}

impl fmt::Debug for MutableArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.read().iter())
            .finish()
    }
}
