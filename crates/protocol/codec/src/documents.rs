//! Index documents and the builders that produce them from node records.

use crate::{
    CodecError, RawBlock, RawTransaction, ScaleConfig, contract_address_for_nonce, fingerprint,
    parse_u64, parse_u256,
};
use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Serialize};

/// A block document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDocument {
    /// Block number, the document id.
    pub number: u64,
    /// Block hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<B256>,
    /// Parent block hash.
    pub parent_hash: B256,
    /// Beneficiary address.
    pub miner: Address,
    /// Timestamp in epoch milliseconds.
    pub timestamp: u64,
    /// Encoded size in bytes.
    pub size: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Gas used.
    pub gas_used: u64,
    /// Scaled difficulty.
    pub difficulty: f64,
    /// Scaled total difficulty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_difficulty: Option<f64>,
    /// Number of transactions.
    pub num_transactions: u64,
    /// Number of uncles.
    pub num_uncles: u64,
    /// Revision of the scaling quotient.
    pub scale_revision: u16,
}

impl BlockDocument {
    /// Builds a [`BlockDocument`] from a [`RawBlock`].
    pub fn from_raw(raw: &RawBlock, scale: &ScaleConfig) -> Result<Self, CodecError> {
        let difficulty = match raw.difficulty.as_deref() {
            Some(difficulty) => parse_u256("difficulty", difficulty)?,
            None => U256::ZERO,
        };
        let total_difficulty = raw
            .total_difficulty
            .as_deref()
            .map(|td| parse_u256("totalDifficulty", td).map(|td| scale.scale(td)))
            .transpose()?;

        Ok(Self {
            number: parse_u64("number", &raw.number)?,
            hash: raw.hash,
            parent_hash: raw.parent_hash,
            miner: raw.miner,
            timestamp: parse_u64("timestamp", &raw.timestamp)?.saturating_mul(1000),
            size: raw.size.as_deref().map(|size| parse_u64("size", size)).transpose()?.unwrap_or(0),
            gas_limit: parse_u64("gasLimit", &raw.gas_limit)?,
            gas_used: parse_u64("gasUsed", &raw.gas_used)?,
            difficulty: scale.scale(difficulty),
            total_difficulty,
            num_transactions: raw.transactions.len() as u64,
            num_uncles: raw.uncles.len() as u64,
            scale_revision: scale.revision,
        })
    }
}

/// A transaction document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDocument {
    /// Transaction hash.
    pub hash: B256,
    /// Including block number.
    pub block_number: u64,
    /// Position in the including block.
    pub transaction_index: u64,
    /// Sender.
    pub from: Address,
    /// Recipient. Omitted for contract creations so that "missing `to`" queries match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Scaled value.
    pub value: f64,
    /// Gas limit.
    pub gas: u64,
    /// Gas price in wei.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u64>,
    /// Sender nonce.
    pub nonce: u64,
    /// Call data or init code.
    pub input: Bytes,
    /// Block timestamp in epoch milliseconds plus the transaction index.
    pub timestamp: u64,
    /// Revision of the scaling quotient.
    pub scale_revision: u16,
}

impl TransactionDocument {
    /// Builds a [`TransactionDocument`] for the transaction at `index` of the block with
    /// number `block_number` and timestamp `block_timestamp` (epoch milliseconds).
    pub fn from_raw(
        raw: &RawTransaction,
        block_number: u64,
        index: u64,
        block_timestamp: u64,
        scale: &ScaleConfig,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            hash: raw.hash,
            block_number,
            transaction_index: index,
            from: raw.from,
            to: raw.to,
            value: scale.scale(parse_u256("value", &raw.value)?),
            gas: parse_u64("gas", &raw.gas)?,
            gas_price: raw.gas_price.as_deref().map(|p| parse_u64("gasPrice", p)).transpose()?,
            nonce: parse_u64("nonce", &raw.nonce)?,
            input: raw.input.clone(),
            timestamp: block_timestamp.saturating_add(index),
            scale_revision: scale.revision,
        })
    }

    /// Returns true if this transaction created a contract.
    pub const fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// A contract document, keyed by the derived contract address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDocument {
    /// Derived contract address.
    pub address: Address,
    /// Sender of the creating transaction.
    pub creator: Address,
    /// Nonce of the creating transaction.
    pub nonce: u64,
    /// Hash of the creating transaction.
    pub transaction_hash: B256,
    /// Block of the creating transaction.
    pub block_number: u64,
    /// Index of the creating transaction.
    pub transaction_index: u64,
    /// Timestamp of the creating transaction.
    pub timestamp: u64,
    /// Scaled endowment.
    pub value: f64,
    /// Fingerprint of the init code.
    pub input_hash: String,
    /// Init code length in bytes.
    pub input_length: u64,
    /// Scaled balance, written by the balance backfill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    /// Runtime code, written by the code backfill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Bytes>,
    /// Fingerprint of the runtime code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_hash: Option<String>,
    /// Runtime code length in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_length: Option<u64>,
    /// Revision of the scaling quotient.
    pub scale_revision: u16,
}

impl ContractDocument {
    /// Builds the [`ContractDocument`] for a contract-creation transaction.
    ///
    /// Returns `None` if the transaction has a recipient.
    pub fn from_creation(tx: &TransactionDocument) -> Option<Self> {
        if !tx.is_contract_creation() {
            return None;
        }
        Some(Self {
            address: contract_address_for_nonce(tx.from, tx.nonce),
            creator: tx.from,
            nonce: tx.nonce,
            transaction_hash: tx.hash,
            block_number: tx.block_number,
            transaction_index: tx.transaction_index,
            timestamp: tx.timestamp,
            value: tx.value,
            input_hash: fingerprint(&tx.input),
            input_length: tx.input.len() as u64,
            balance: None,
            code: None,
            code_hash: None,
            code_length: None,
            scale_revision: tx.scale_revision,
        })
    }
}

/// Partial contract update written by the balance backfill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    /// Scaled balance.
    pub balance: f64,
}

impl BalanceUpdate {
    /// Scales a raw wei balance.
    pub fn new(balance: U256, scale: &ScaleConfig) -> Self {
        Self { balance: scale.scale(balance) }
    }
}

/// Partial contract update written by the code backfill.
///
/// Carries only the code fields. The update never writes a `balance`, so a
/// balance from an earlier backfill is neither overwritten with a stale value
/// nor cleared; only the balance backfill touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeUpdate {
    /// Runtime code.
    pub code: Bytes,
    /// Fingerprint of the runtime code.
    pub code_hash: String,
    /// Runtime code length in bytes.
    pub code_length: u64,
}

impl CodeUpdate {
    /// Fingerprints and measures `code`.
    pub fn new(code: Bytes) -> Self {
        Self { code_hash: fingerprint(&code), code_length: code.len() as u64, code }
    }
}
