//! The HTTP node client.

use crate::{ChainNode, NodeClientConfig, NodeError, NodeResponse, retry::call_with_retry};
use alloy_json_rpc::{RpcRecv, RpcSend};
use alloy_primitives::{Address, Bytes, U64, U256};
use alloy_rpc_client::RpcClient;
use alloy_transport_http::Http;
use async_trait::async_trait;
use chainscan_codec::{RawBlock, RawTransaction};

/// A [`ChainNode`] backed by a JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct NodeClient {
    rpc: RpcClient,
    config: NodeClientConfig,
}

impl NodeClient {
    /// Creates an HTTP client. Each request is aborted after `config.request_timeout`.
    pub fn new(config: NodeClientConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NodeError::InvalidConfig(e.to_string()))?;
        let rpc = RpcClient::new(Http::with_client(http, config.url.clone()), false);
        Ok(Self { rpc, config })
    }

    /// Creates a client over an existing RPC client.
    pub const fn with_rpc_client(rpc: RpcClient, config: NodeClientConfig) -> Self {
        Self { rpc, config }
    }

    /// Returns the client configuration.
    pub const fn config(&self) -> &NodeClientConfig {
        &self.config
    }

    async fn request<P, R>(&self, method: &'static str, params: P) -> Result<NodeResponse<R>, NodeError>
    where
        P: RpcSend,
        R: RpcRecv,
    {
        trace!(target: "node_client", method, ?params, "Node request");
        let rpc = &self.rpc;
        call_with_retry(&self.config, method, || {
            let params = params.clone();
            async move { rpc.request::<P, Option<R>>(method, params).await }
        })
        .await
    }
}

#[async_trait]
impl ChainNode for NodeClient {
    async fn block_by_number(&self, number: u64) -> Result<NodeResponse<RawBlock>, NodeError> {
        self.request("eth_getBlockByNumber", (U64::from(number), false)).await
    }

    async fn transaction_by_block_and_index(
        &self,
        number: u64,
        index: u64,
    ) -> Result<NodeResponse<RawTransaction>, NodeError> {
        self.request("eth_getTransactionByBlockNumberAndIndex", (U64::from(number), U64::from(index)))
            .await
    }

    async fn balance(&self, address: Address) -> Result<NodeResponse<U256>, NodeError> {
        self.request("eth_getBalance", (address, "latest")).await
    }

    async fn code(&self, address: Address) -> Result<NodeResponse<Bytes>, NodeError> {
        self.request("eth_getCode", (address, "latest")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, bytes};
    use alloy_transport::mock::{Asserter, MockTransport};
    use serde_json::json;
    use std::time::Duration;
    use url::Url;

    fn mock_client(asserter: &Asserter) -> NodeClient {
        let rpc = RpcClient::new(MockTransport::new(asserter.clone()), false);
        let config = NodeClientConfig::new(Url::parse("http://localhost:8545").unwrap());
        NodeClient::with_rpc_client(rpc, config)
    }

    fn block_json() -> serde_json::Value {
        json!({
            "number": "0x5",
            "hash": "0x6c4a6e9e4ab6bf4b1e3f6b0b5e0d4d5a0b4fcbd3f6e7e1a4a2b1c0d9e8f7a6b5",
            "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000001",
            "miner": "0x05a56e2d52c817161883f50c441c3228cfe54d9f",
            "timestamp": "0x55ba4224",
            "size": "0x21b",
            "gasLimit": "0x1388",
            "gasUsed": "0x0",
            "difficulty": "0x3ff800000",
            "totalDifficulty": "0xbfe400000",
            "transactions": [],
            "uncles": []
        })
    }

    #[tokio::test]
    async fn test_block_found() {
        let asserter = Asserter::new();
        asserter.push_success(&block_json());

        let block = mock_client(&asserter).block_by_number(5).await.unwrap().found().unwrap();
        assert_eq!(block.number, "0x5");
        assert_eq!(block.miner, address!("05a56e2d52c817161883f50c441c3228cfe54d9f"));
        assert_eq!(
            block.parent_hash,
            b256!("0000000000000000000000000000000000000000000000000000000000000001")
        );
    }

    #[tokio::test]
    async fn test_block_not_yet_produced() {
        let asserter = Asserter::new();
        asserter.push_success(&serde_json::Value::Null);

        let response = mock_client(&asserter).block_by_number(u64::MAX).await.unwrap();
        assert_eq!(response, NodeResponse::Null);
    }

    #[tokio::test]
    async fn test_rpc_error_is_a_response() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("missing trie node");

        let response = mock_client(&asserter).transaction_by_block_and_index(5, 0).await.unwrap();
        let NodeResponse::RpcError(payload) = response else {
            panic!("expected an error payload, got {response:?}");
        };
        assert_eq!(payload.message, "missing trie node");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let asserter = Asserter::new();
        asserter.push_success(&json!({ "number": 5 }));

        let err = mock_client(&asserter).block_by_number(5).await.unwrap_err();
        assert!(matches!(err, NodeError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_balance_and_code() {
        let asserter = Asserter::new();
        asserter.push_success(&"0xde0b6b3a7640000");
        asserter.push_success(&"0x6060604052");

        let client = mock_client(&asserter);
        let contract = address!("cd234a471b72ba2f1ccf0a70fcaba648a5eecd8d");
        assert_eq!(
            client.balance(contract).await.unwrap(),
            NodeResponse::Found(U256::from(1_000_000_000_000_000_000u64))
        );
        assert_eq!(client.code(contract).await.unwrap(), NodeResponse::Found(bytes!("6060604052")));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_fatal() {
        let config = NodeClientConfig::new(Url::parse("http://127.0.0.1:1").unwrap())
            .with_retry_attempts(2)
            .with_retry_delay(Duration::from_millis(40));
        let client = NodeClient::new(config).unwrap();

        let err = client.block_by_number(0).await.unwrap_err();
        assert!(matches!(
            err,
            NodeError::Unavailable { attempts: 3, .. } | NodeError::Timeout { attempts: 3 }
        ));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let config = NodeClientConfig::new(Url::parse("http://localhost:8545").unwrap())
            .with_request_timeout(Duration::from_secs(10));
        assert!(matches!(NodeClient::new(config), Err(NodeError::InvalidConfig(_))));
    }
}
