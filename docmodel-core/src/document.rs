//! Persisted documents.
//!
//! A [`MutableDocument`] is a root [`MutableDictionary`] with an identity in a
//! [`Database`](crate::database::Database). Models constructed from a document can be saved;
//! models built over a plain dictionary cannot.

use bson::Uuid;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use crate::container::MutableDictionary;

/// Revision value meaning "never saved or loaded".
const NO_REVISION: i64 = 0;

#[derive(Clone)]
pub struct MutableDocument {
    id: Uuid,
    dictionary: MutableDictionary,
    revision: Arc<AtomicI64>,
}

impl MutableDocument {
    /// Creates an empty document with a fresh random id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new())
    }

    /// Creates an empty document with the given id.
    pub fn with_id(id: Uuid) -> Self {
        Self::from_parts(id, MutableDictionary::new(), None)
    }

    pub(crate) fn from_parts(id: Uuid, dictionary: MutableDictionary, revision: Option<i64>) -> Self {
        Self {
            id,
            dictionary,
            revision: Arc::new(AtomicI64::new(revision.unwrap_or(NO_REVISION))),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// The root dictionary holding the document's properties.
    pub fn dictionary(&self) -> &MutableDictionary {
        &self.dictionary
    }

    /// The stored revision this document was last loaded from or saved as.
    pub fn revision(&self) -> Option<i64> {
        match self.revision.load(Ordering::Acquire) {
            NO_REVISION => None,
            revision => Some(revision),
        }
    }

    pub(crate) fn set_revision(&self, revision: i64) {
        self.revision.store(revision, Ordering::Release);
    }

    /// Returns `true` if both handles refer to the same document.
    pub fn ptr_eq(&self, other: &MutableDocument) -> bool {
        self.dictionary.ptr_eq(&other.dictionary)
    }
}

impl Default for MutableDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MutableDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableDocument")
            .field("id", &self.id)
            .field("revision", &self.revision())
            .field("dictionary", &self.dictionary)
            .finish()
    }
}
