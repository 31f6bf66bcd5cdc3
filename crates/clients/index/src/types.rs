//! Request and response types shared by index store implementations.

use crate::IndexError;
use derive_more::Constructor;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A document addressed by id, as written in a bulk request.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct BulkItem {
    /// Document id.
    pub id: String,
    /// Full document for creates, partial document for updates.
    pub document: Value,
}

impl BulkItem {
    /// Serializes `document` into a bulk item.
    pub fn from_document<T: Serialize>(
        id: impl Into<String>,
        document: &T,
    ) -> Result<Self, IndexError> {
        Ok(Self { id: id.into(), document: serde_json::to_value(document)? })
    }
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Hit {
    /// Document id.
    pub id: String,
    /// Stored document.
    pub source: Value,
}

impl Hit {
    /// Deserializes the stored document.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, IndexError> {
        Ok(T::deserialize(&self.source)?)
    }
}

/// Result of a single-document create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The document was written.
    Created,
    /// A document with that id already existed and was left untouched.
    Existed,
}

/// A bulk item the store refused.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct BulkFailure {
    /// Document id.
    pub id: String,
    /// Item status code.
    pub status: u16,
    /// Error reason reported by the store.
    pub reason: String,
}

/// Per-item tally of a bulk request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Items applied.
    pub succeeded: usize,
    /// Creates that hit an existing document, and deletes of missing ones.
    pub conflicts: usize,
    /// Items that failed for any other reason.
    pub failures: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// Total number of items reported.
    pub const fn total(&self) -> usize {
        self.succeeded + self.conflicts + self.failures.len()
    }

    /// Converts item failures into [`IndexError::BulkItems`].
    pub fn into_result(self) -> Result<Self, IndexError> {
        if self.failures.is_empty() { Ok(self) } else { Err(IndexError::BulkItems(self.failures)) }
    }

    /// Adds the counts of `other` to `self`.
    pub fn merge(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.conflicts += other.conflicts;
        self.failures.extend(other.failures);
    }
}
