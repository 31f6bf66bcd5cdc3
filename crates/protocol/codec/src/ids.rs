//! Document id synthesis.

use crate::CodecError;
use alloy_primitives::{Address, hex};

/// Transactions per block the id scheme can address.
pub const TRANSACTION_ID_STRIDE: u64 = 100_000;

/// The document id of a block.
pub fn block_id(number: u64) -> String {
    number.to_string()
}

/// The document id of the transaction at `index` in block `block`:
/// `block * 100000 + index`.
pub fn transaction_id(block: u64, index: u64) -> Result<u64, CodecError> {
    if index >= TRANSACTION_ID_STRIDE {
        return Err(CodecError::TransactionIndexOverflow { block, index });
    }
    block
        .checked_mul(TRANSACTION_ID_STRIDE)
        .and_then(|base| base.checked_add(index))
        .ok_or(CodecError::TransactionIndexOverflow { block, index })
}

/// The document id of a contract, its lowercase `0x`-prefixed address.
pub fn address_id(address: &Address) -> String {
    hex::encode_prefixed(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_transaction_ids() {
        assert_eq!(transaction_id(5, 0).unwrap(), 500_000);
        assert_eq!(transaction_id(5, 1).unwrap(), 500_001);
        assert_eq!(transaction_id(0, 99_999).unwrap(), 99_999);
    }

    #[test]
    fn test_transaction_index_overflow() {
        assert_eq!(
            transaction_id(5, 100_000),
            Err(CodecError::TransactionIndexOverflow { block: 5, index: 100_000 })
        );
        assert!(transaction_id(u64::MAX, 0).is_err());
    }

    #[test]
    fn test_address_id_is_prefixed_lowercase() {
        let addr = address!("343c43a37d37dff08ae8c4a11544c718abb4fcf8");
        assert_eq!(address_id(&addr), "0x343c43a37d37dff08ae8c4a11544c718abb4fcf8");
    }
}
