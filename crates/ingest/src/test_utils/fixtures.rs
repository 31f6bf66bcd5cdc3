use alloy_primitives::{Address, B256, Bytes};
use chainscan_codec::{RawBlock, RawTransaction};

/// A deterministic sender address.
pub fn sender(seed: u8) -> Address {
    Address::repeat_byte(seed)
}

/// A block with `transactions` transaction hashes, mined 15 seconds apart.
pub fn raw_block(number: u64, transactions: u64) -> RawBlock {
    RawBlock {
        number: format!("{number:#x}"),
        hash: Some(B256::left_padding_from(&number.to_be_bytes())),
        parent_hash: B256::left_padding_from(&number.saturating_sub(1).to_be_bytes()),
        miner: sender(0xee),
        timestamp: format!("{:#x}", 1_438_269_960 + number * 15),
        size: Some("0x21b".to_string()),
        gas_limit: "0x2fefd8".to_string(),
        gas_used: format!("{:#x}", 21_000 * transactions),
        difficulty: Some("0x3ff800000".to_string()),
        total_difficulty: Some(format!("{:#x}", 0x3ff800000u64 * (number + 1))),
        transactions: (0..transactions)
            .map(|index| B256::left_padding_from(&(number * 1_000 + index).to_be_bytes()))
            .collect(),
        uncles: Vec::new(),
    }
}

/// A value transfer at `index` of block `number`.
pub fn raw_transaction(number: u64, index: u64) -> RawTransaction {
    RawTransaction {
        hash: B256::left_padding_from(&(number * 1_000 + index).to_be_bytes()),
        block_number: Some(format!("{number:#x}")),
        transaction_index: Some(format!("{index:#x}")),
        from: sender(0x11),
        to: Some(sender(0x22)),
        value: "0xde0b6b3a7640000".to_string(),
        gas: "0x5208".to_string(),
        gas_price: Some("0x4a817c800".to_string()),
        nonce: format!("{:#x}", number * 100 + index),
        input: Bytes::new(),
    }
}

/// A contract creation by `from` with `nonce` at `index` of block `number`.
pub fn creation_transaction(number: u64, index: u64, from: Address, nonce: u64) -> RawTransaction {
    RawTransaction {
        from,
        to: None,
        nonce: format!("{nonce:#x}"),
        value: "0x0".to_string(),
        input: Bytes::from_static(&[0x60, 0x60, 0x60, 0x40, 0x52]),
        ..raw_transaction(number, index)
    }
}
