//! The document store abstraction consumed by the ingestion pipeline.

use crate::{BulkItem, BulkOutcome, CreateOutcome, Hit, IndexError, RecordKind, SearchQuery};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// Persistent storage for indexed records.
///
/// Implementations absorb transient unavailability themselves; every error they
/// return is final for the calling pass.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait IndexStore: Debug + Send + Sync {
    /// Creates a single document. An existing document with that id is left untouched.
    async fn create_one(
        &self,
        kind: RecordKind,
        id: String,
        document: Value,
    ) -> Result<CreateOutcome, IndexError>;

    /// Creates many documents in one request.
    ///
    /// Existing ids count as conflicts. Any other item failure is returned as
    /// [`IndexError::BulkItems`].
    async fn bulk_create(
        &self,
        kind: RecordKind,
        items: Vec<BulkItem>,
    ) -> Result<BulkOutcome, IndexError>;

    /// Merges partial documents into existing ones.
    async fn bulk_update(
        &self,
        kind: RecordKind,
        items: Vec<BulkItem>,
    ) -> Result<BulkOutcome, IndexError>;

    /// Deletes documents by id. Missing ids count as conflicts.
    async fn bulk_delete(&self, kind: RecordKind, ids: Vec<String>)
    -> Result<BulkOutcome, IndexError>;

    /// Runs a search and returns one page of hits.
    async fn search(&self, kind: RecordKind, query: SearchQuery) -> Result<Vec<Hit>, IndexError>;

    /// Returns the highest committed block number, if any block is stored.
    async fn highest_block_number(&self) -> Result<Option<u64>, IndexError>;

    /// Counts the documents of `kind`.
    async fn count(&self, kind: RecordKind) -> Result<u64, IndexError>;

    /// Drops and recreates the index for `kind` with its mapping.
    async fn recreate(&self, kind: RecordKind) -> Result<(), IndexError>;
}
