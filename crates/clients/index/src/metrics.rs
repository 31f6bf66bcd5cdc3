//! Metrics for the index store.

use crate::{BulkOutcome, RecordKind};

/// Container for index store metric names.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of requests retried while the store was unavailable, labeled by operation.
    pub const INDEX_RETRIES_TOTAL: &'static str = "chainscan_index_retries_total";
    /// Counter of bulk items by record kind and result.
    pub const INDEX_BULK_ITEMS_TOTAL: &'static str = "chainscan_index_bulk_items_total";

    /// Describes and zeroes the index store metrics.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::INDEX_RETRIES_TOTAL,
            metrics::Unit::Count,
            "Index requests retried after a transient failure",
        );
        metrics::describe_counter!(
            Self::INDEX_BULK_ITEMS_TOTAL,
            metrics::Unit::Count,
            "Bulk items processed by the index store",
        );
    }

    fn zero() {
        metrics::counter!(Self::INDEX_RETRIES_TOTAL).increment(0);
        for kind in RecordKind::ALL {
            for result in ["succeeded", "conflict", "failed"] {
                metrics::counter!(
                    Self::INDEX_BULK_ITEMS_TOTAL,
                    "kind" => kind.to_string(),
                    "result" => result,
                )
                .increment(0);
            }
        }
    }

    pub(crate) fn record_bulk(kind: RecordKind, outcome: &BulkOutcome) {
        let counts = [
            ("succeeded", outcome.succeeded),
            ("conflict", outcome.conflicts),
            ("failed", outcome.failures.len()),
        ];
        for (result, count) in counts {
            metrics::counter!(
                Self::INDEX_BULK_ITEMS_TOTAL,
                "kind" => kind.to_string(),
                "result" => result,
            )
            .increment(count as u64);
        }
    }
}
