#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::CodecError;

mod quantity;
pub use quantity::{parse_u64, parse_u256, strip_hex_prefix};

mod scale;
pub use scale::{DEFAULT_SCALE_QUOTIENT, DEFAULT_SCALE_REVISION, ScaleConfig};

mod address;
pub use address::{contract_address, contract_address_for_nonce, create_address};

mod fingerprint;
pub use fingerprint::{FINGERPRINT_BYTES, fingerprint};

mod ids;
pub use ids::{TRANSACTION_ID_STRIDE, address_id, block_id, transaction_id};

mod raw;
pub use raw::{RawBlock, RawTransaction};

mod documents;
pub use documents::{
    BalanceUpdate, BlockDocument, CodeUpdate, ContractDocument, TransactionDocument,
};
