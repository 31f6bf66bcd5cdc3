//! Metrics for the node client.

/// Container for node client metric names.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of retried node requests, labeled by method.
    pub const NODE_RETRIES_TOTAL: &'static str = "chainscan_node_retries_total";
    /// Counter of node requests that failed after all retries, labeled by method.
    pub const NODE_FAILURES_TOTAL: &'static str = "chainscan_node_failures_total";

    /// Describes and zeroes the node client metrics.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::NODE_RETRIES_TOTAL,
            metrics::Unit::Count,
            "Node requests retried after a connection failure",
        );
        metrics::describe_counter!(
            Self::NODE_FAILURES_TOTAL,
            metrics::Unit::Count,
            "Node requests abandoned after exhausting retries",
        );
    }

    fn zero() {
        metrics::counter!(Self::NODE_RETRIES_TOTAL).increment(0);
        metrics::counter!(Self::NODE_FAILURES_TOTAL).increment(0);
    }
}
