//! Metrics for the ingestion passes.

/// Container for ingestion metric names.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of blocks committed by the walker.
    pub const WALKER_BLOCKS_TOTAL: &'static str = "chainscan_walker_blocks_total";
    /// Counter of transactions written by the walker.
    pub const WALKER_TRANSACTIONS_TOTAL: &'static str = "chainscan_walker_transactions_total";
    /// Counter of block refetches, labeled by reason.
    pub const WALKER_RETRIES_TOTAL: &'static str = "chainscan_walker_retries_total";
    /// Counter of blocks dropped because of undecodable node records.
    pub const WALKER_SKIPPED_TOTAL: &'static str = "chainscan_walker_skipped_total";
    /// Gauge of the last committed block number.
    pub const WALKER_HEAD: &'static str = "chainscan_walker_head";
    /// Counter of contract documents written, labeled by pass.
    pub const RESOLVER_ITEMS_TOTAL: &'static str = "chainscan_resolver_items_total";
    /// Counter of contracts skipped by a backfill, labeled by pass.
    pub const RESOLVER_SKIPPED_TOTAL: &'static str = "chainscan_resolver_skipped_total";

    /// Pass label values.
    const PASSES: [&'static str; 4] = ["discover", "balances", "codes", "wipe"];
    /// Retry reason label values.
    const RETRY_REASONS: [&'static str; 3] = ["head", "rpc_error", "gap"];

    /// Describes and zeroes the ingestion metrics.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::WALKER_BLOCKS_TOTAL,
            metrics::Unit::Count,
            "Blocks committed by the block walker",
        );
        metrics::describe_counter!(
            Self::WALKER_TRANSACTIONS_TOTAL,
            metrics::Unit::Count,
            "Transactions written by the block walker",
        );
        metrics::describe_counter!(
            Self::WALKER_RETRIES_TOTAL,
            metrics::Unit::Count,
            "Blocks scheduled for another fetch",
        );
        metrics::describe_counter!(
            Self::WALKER_SKIPPED_TOTAL,
            metrics::Unit::Count,
            "Blocks dropped because the node returned undecodable records",
        );
        metrics::describe_gauge!(Self::WALKER_HEAD, "Last block committed by the block walker");
        metrics::describe_counter!(
            Self::RESOLVER_ITEMS_TOTAL,
            metrics::Unit::Count,
            "Contract documents written by the contract resolver",
        );
        metrics::describe_counter!(
            Self::RESOLVER_SKIPPED_TOTAL,
            metrics::Unit::Count,
            "Contracts skipped by a backfill after a node error",
        );
    }

    fn zero() {
        metrics::counter!(Self::WALKER_BLOCKS_TOTAL).increment(0);
        metrics::counter!(Self::WALKER_TRANSACTIONS_TOTAL).increment(0);
        metrics::counter!(Self::WALKER_SKIPPED_TOTAL).increment(0);
        for reason in Self::RETRY_REASONS {
            metrics::counter!(Self::WALKER_RETRIES_TOTAL, "reason" => reason).increment(0);
        }
        for pass in Self::PASSES {
            metrics::counter!(Self::RESOLVER_ITEMS_TOTAL, "pass" => pass).increment(0);
            metrics::counter!(Self::RESOLVER_SKIPPED_TOTAL, "pass" => pass).increment(0);
        }
    }
}
