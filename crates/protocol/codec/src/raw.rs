//! Records as returned by the node's JSON-RPC interface.
//!
//! Numeric fields are kept as the raw hex quantities the node sends; they are
//! parsed when a document is built so a malformed value can be reported with the
//! field it came from.

use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Serialize};

/// A block as returned by `eth_getBlockByNumber(number, false)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    /// Block number.
    pub number: String,
    /// Block hash, absent for pending blocks.
    #[serde(default)]
    pub hash: Option<B256>,
    /// Parent block hash.
    pub parent_hash: B256,
    /// Beneficiary address.
    pub miner: Address,
    /// Unix timestamp in seconds.
    pub timestamp: String,
    /// Encoded block size in bytes.
    #[serde(default)]
    pub size: Option<String>,
    /// Gas limit.
    pub gas_limit: String,
    /// Gas used.
    pub gas_used: String,
    /// Difficulty.
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Total difficulty of the chain up to this block.
    #[serde(default)]
    pub total_difficulty: Option<String>,
    /// Transaction hashes.
    #[serde(default)]
    pub transactions: Vec<B256>,
    /// Uncle hashes.
    #[serde(default)]
    pub uncles: Vec<B256>,
}

/// A transaction as returned by `eth_getTransactionByBlockNumberAndIndex`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Number of the including block.
    #[serde(default)]
    pub block_number: Option<String>,
    /// Position in the including block.
    #[serde(default)]
    pub transaction_index: Option<String>,
    /// Sender.
    pub from: Address,
    /// Recipient, absent for contract creations.
    #[serde(default)]
    pub to: Option<Address>,
    /// Transferred value in wei.
    pub value: String,
    /// Gas limit.
    pub gas: String,
    /// Gas price in wei.
    #[serde(default)]
    pub gas_price: Option<String>,
    /// Sender nonce.
    pub nonce: String,
    /// Call data or init code.
    #[serde(default)]
    pub input: Bytes,
}
