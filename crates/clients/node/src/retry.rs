//! Fixed-delay retry around a single node call.

use crate::{NodeClientConfig, NodeError, NodeResponse};
use alloy_transport::{RpcError, TransportError, TransportErrorKind};
use backon::{ConstantBuilder, Retryable};
use std::future::Future;

/// Runs `call` until it succeeds, fails with a non-retryable error, or the retry
/// ceiling is reached.
pub(crate) async fn call_with_retry<T, F, Fut>(
    config: &NodeClientConfig,
    method: &'static str,
    call: F,
) -> Result<NodeResponse<T>, NodeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, TransportError>>,
{
    let policy = ConstantBuilder::default()
        .with_delay(config.retry_delay)
        .with_max_times(config.retry_attempts);

    let result = call
        .retry(policy)
        .when(is_retryable)
        .notify(|err, delay| {
            warn!(target: "node_client", method, %err, ?delay, "Node request failed, retrying");
            #[cfg(feature = "metrics")]
            metrics::counter!(crate::Metrics::NODE_RETRIES_TOTAL, "method" => method).increment(1);
        })
        .await;

    match result {
        Ok(value) => Ok(value.into()),
        Err(RpcError::ErrorResp(payload)) => {
            debug!(target: "node_client", method, code = payload.code, message = %payload.message, "Node returned an error payload");
            Ok(NodeResponse::RpcError(payload))
        }
        Err(RpcError::NullResp) => Ok(NodeResponse::Null),
        Err(RpcError::DeserError { err, text }) => {
            error!(target: "node_client", method, %err, body = %text, "Undecodable node response");
            Err(NodeError::Malformed(err.to_string()))
        }
        Err(err) => {
            #[cfg(feature = "metrics")]
            metrics::counter!(crate::Metrics::NODE_FAILURES_TOTAL, "method" => method).increment(1);
            Err(exhausted(config, method, err))
        }
    }
}

fn exhausted(config: &NodeClientConfig, method: &'static str, err: TransportError) -> NodeError {
    let attempts = config.retry_attempts + 1;
    if !is_retryable(&err) {
        error!(target: "node_client", method, %err, "Node request failed");
        return NodeError::Transport(err.to_string());
    }
    error!(target: "node_client", method, attempts, %err, "Lost connection to node, giving up");
    match &err {
        RpcError::Transport(kind) if is_timeout(kind) => NodeError::Timeout { attempts },
        _ => NodeError::Unavailable { attempts, reason: err.to_string() },
    }
}

/// Connection-level failures worth another attempt.
pub(crate) fn is_retryable(err: &TransportError) -> bool {
    match err {
        RpcError::Transport(TransportErrorKind::HttpError(http)) => {
            matches!(http.status, 502..=504)
        }
        RpcError::Transport(TransportErrorKind::Custom(_) | TransportErrorKind::BackendGone) => true,
        _ => false,
    }
}

fn is_timeout(kind: &TransportErrorKind) -> bool {
    match kind {
        TransportErrorKind::Custom(err) => {
            err.downcast_ref::<reqwest::Error>().is_some_and(reqwest::Error::is_timeout)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_transport::HttpError;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };
    use url::Url;

    fn config(attempts: usize) -> NodeClientConfig {
        NodeClientConfig::new(Url::parse("http://localhost:8545").unwrap())
            .with_retry_attempts(attempts)
            .with_retry_delay(Duration::from_millis(4))
    }

    fn http_error(status: u16) -> TransportError {
        RpcError::Transport(TransportErrorKind::HttpError(HttpError { status, body: String::new() }))
    }

    #[tokio::test]
    async fn test_retries_below_ceiling() {
        let calls = AtomicUsize::new(0);
        let response = call_with_retry(&config(3), "test", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TransportErrorKind::backend_gone())
            } else {
                Ok(Some(7u64))
            }
        })
        .await
        .unwrap();

        assert_eq!(response, NodeResponse::Found(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_ceiling_is_fatal() {
        let calls = AtomicUsize::new(0);
        let err = call_with_retry::<u64, _, _>(&config(2), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TransportErrorKind::backend_gone())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, NodeError::Unavailable { attempts: 3, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let calls = AtomicUsize::new(0);
        let err = call_with_retry::<u64, _, _>(&config(5), "test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(http_error(401))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, NodeError::Transport(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(&http_error(502)));
        assert!(is_retryable(&http_error(503)));
        assert!(is_retryable(&http_error(504)));
        assert!(!is_retryable(&http_error(500)));
        assert!(!is_retryable(&http_error(404)));
    }
}
