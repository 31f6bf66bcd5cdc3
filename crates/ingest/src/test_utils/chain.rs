use super::{Journal, raw_block, raw_transaction};
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use chainscan_codec::{RawBlock, RawTransaction};
use chainscan_node_client::{ChainNode, NodeError, NodeResponse};
use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
};

/// A call made against the [`MockChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCall {
    /// `eth_getBlockByNumber`.
    Block(u64),
    /// `eth_getTransactionByBlockNumberAndIndex`.
    Transaction(u64, u64),
    /// `eth_getBalance`.
    Balance(Address),
    /// `eth_getCode`.
    Code(Address),
}

/// A scripted failure, consumed by the next matching call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFault {
    /// Respond with `null`.
    Null,
    /// Respond with a JSON-RPC error payload.
    RpcError(String),
    /// Fail with a client error.
    Error(NodeError),
}

#[derive(Debug, Default)]
struct ChainState {
    blocks: BTreeMap<u64, RawBlock>,
    transactions: HashMap<(u64, u64), RawTransaction>,
    balances: HashMap<Address, U256>,
    codes: HashMap<Address, Bytes>,
    faults: HashMap<NodeCall, VecDeque<NodeFault>>,
    calls: Vec<NodeCall>,
    journal: Option<Journal>,
}

/// An in-memory [`ChainNode`].
///
/// Unknown blocks, transactions and accounts answer `null`.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain of blocks `0..count` where block `n` holds `transactions(n)`
    /// value transfers.
    pub fn with_blocks(count: u64, transactions: impl Fn(u64) -> u64) -> Self {
        let chain = Self::new();
        for number in 0..count {
            let txs = (0..transactions(number)).map(|index| raw_transaction(number, index)).collect();
            chain.insert_block(raw_block(number, transactions(number)), txs);
        }
        chain
    }

    /// Attaches a journal that records every call.
    pub fn with_journal(self, journal: Journal) -> Self {
        self.lock().journal = Some(journal);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a block and the transactions at its indices `0..`.
    pub fn insert_block(&self, block: RawBlock, transactions: Vec<RawTransaction>) {
        let number = u64::from_str_radix(block.number.trim_start_matches("0x"), 16).unwrap_or_default();
        let mut state = self.lock();
        for (index, tx) in transactions.into_iter().enumerate() {
            state.transactions.insert((number, index as u64), tx);
        }
        state.blocks.insert(number, block);
    }

    /// Replaces the transaction at `index` of block `number`.
    pub fn set_transaction(&self, number: u64, index: u64, tx: RawTransaction) {
        self.lock().transactions.insert((number, index), tx);
    }

    /// Sets the balance of `address`.
    pub fn set_balance(&self, address: Address, balance: U256) {
        self.lock().balances.insert(address, balance);
    }

    /// Sets the code of `address`.
    pub fn set_code(&self, address: Address, code: Bytes) {
        self.lock().codes.insert(address, code);
    }

    /// Queues a failure for the next `call`.
    pub fn push_fault(&self, call: NodeCall, fault: NodeFault) {
        self.lock().faults.entry(call).or_default().push_back(fault);
    }

    /// Returns every call made so far.
    pub fn calls(&self) -> Vec<NodeCall> {
        self.lock().calls.clone()
    }

    /// Counts the calls equal to `call`.
    pub fn call_count(&self, call: NodeCall) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    /// Records `call` and returns the scripted fault for it, if any.
    fn begin(&self, call: NodeCall) -> Option<NodeFault> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(journal) = &state.journal {
            journal.record(match call {
                NodeCall::Block(n) => format!("node block {n}"),
                NodeCall::Transaction(n, i) => format!("node tx {n}/{i}"),
                NodeCall::Balance(a) => format!("node balance {a}"),
                NodeCall::Code(a) => format!("node code {a}"),
            });
        }
        state.faults.get_mut(&call).and_then(VecDeque::pop_front)
    }

    fn respond<T>(
        &self,
        call: NodeCall,
        lookup: impl FnOnce(&ChainState) -> Option<T>,
    ) -> Result<NodeResponse<T>, NodeError> {
        match self.begin(call) {
            Some(NodeFault::Null) => Ok(NodeResponse::Null),
            Some(NodeFault::RpcError(message)) => {
                Ok(NodeResponse::RpcError(alloy_json_rpc::ErrorPayload {
                    code: -32000,
                    message: message.into(),
                    data: None,
                }))
            }
            Some(NodeFault::Error(err)) => Err(err),
            None => Ok(lookup(&self.lock()).into()),
        }
    }
}

#[async_trait]
impl ChainNode for MockChain {
    async fn block_by_number(&self, number: u64) -> Result<NodeResponse<RawBlock>, NodeError> {
        self.respond(NodeCall::Block(number), |state| state.blocks.get(&number).cloned())
    }

    async fn transaction_by_block_and_index(
        &self,
        number: u64,
        index: u64,
    ) -> Result<NodeResponse<RawTransaction>, NodeError> {
        // Yield so that sibling fetches interleave.
        tokio::task::yield_now().await;
        self.respond(NodeCall::Transaction(number, index), |state| {
            state.transactions.get(&(number, index)).cloned()
        })
    }

    async fn balance(&self, address: Address) -> Result<NodeResponse<U256>, NodeError> {
        self.respond(NodeCall::Balance(address), |state| state.balances.get(&address).copied())
    }

    async fn code(&self, address: Address) -> Result<NodeResponse<Bytes>, NodeError> {
        self.respond(NodeCall::Code(address), |state| state.codes.get(&address).cloned())
    }
}
