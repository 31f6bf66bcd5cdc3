//! Bulk request encoding and per-item response inspection.

use crate::{BulkFailure, BulkItem, BulkOutcome, IndexError};
use serde_json::{Value, json};

/// The operation a bulk request applies to each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Create, failing per item if the id exists.
    Create,
    /// Merge a partial document into an existing one.
    Update,
    /// Delete by id.
    Delete,
}

impl BulkAction {
    const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Whether an item status counts as a benign conflict for this action.
    const fn is_conflict(self, status: u16) -> bool {
        matches!((self, status), (Self::Create, 409) | (Self::Delete, 404))
    }
}

/// Encodes `items` as a newline-delimited bulk body against `index`.
///
/// Deletes carry no document line; the item documents are ignored.
pub fn encode_bulk(action: BulkAction, index: &str, items: &[BulkItem]) -> String {
    let mut body = String::new();
    for item in items {
        let header = json!({ action.name(): { "_index": index, "_id": item.id } });
        body.push_str(&format!("{header}\n"));
        match action {
            BulkAction::Create => body.push_str(&format!("{}\n", item.document)),
            BulkAction::Update => body.push_str(&format!("{}\n", json!({ "doc": item.document }))),
            BulkAction::Delete => {}
        }
    }
    body
}

/// Tallies a bulk response body.
pub fn parse_bulk_response(action: BulkAction, response: &Value) -> Result<BulkOutcome, IndexError> {
    let items = response
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| IndexError::Malformed("bulk response without items".into()))?;

    let mut outcome = BulkOutcome::default();
    for item in items {
        let result = item
            .as_object()
            .and_then(|object| object.values().next())
            .ok_or_else(|| IndexError::Malformed(format!("unexpected bulk item {item}")))?;
        let status = result
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok())
            .ok_or_else(|| IndexError::Malformed(format!("bulk item without status {item}")))?;
        let id = result.get("_id").and_then(Value::as_str).unwrap_or_default();

        if (200..300).contains(&status) {
            outcome.succeeded += 1;
        } else if action.is_conflict(status) {
            trace!(target: "index", id, status, "Bulk item conflict");
            outcome.conflicts += 1;
        } else {
            let reason = result
                .get("error")
                .map(|error| {
                    error
                        .get("reason")
                        .or_else(|| error.get("type"))
                        .and_then(Value::as_str)
                        .map_or_else(|| error.to_string(), str::to_string)
                })
                .unwrap_or_else(|| format!("status {status}"));
            outcome.failures.push(BulkFailure::new(id.to_string(), status, reason));
        }
    }
    Ok(outcome)
}
