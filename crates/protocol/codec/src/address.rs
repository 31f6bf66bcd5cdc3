//! `CREATE` contract address derivation.
//!
//! The address of a contract created by a plain transaction is the low 20 bytes of
//! `keccak256(rlp([sender, nonce]))`. The hash is the original Keccak-256, which a
//! number of older libraries call "SHA3-256"; FIPS-202 SHA3 yields different
//! addresses.
//!
//! The nonce is handled with a single rule: strip the `0x` marker, left-pad to an
//! even number of hex digits, decode, then drop leading zero bytes so that the RLP
//! item is the canonical integer encoding (nonce zero encodes as the empty string).

use crate::{CodecError, strip_hex_prefix};
use alloy_primitives::{Address, hex, keccak256};
use alloy_rlp::{Encodable, Header};

/// Derives the contract address for the hex-encoded `sender` and `nonce`.
pub fn contract_address(sender: &str, nonce: &str) -> Result<Address, CodecError> {
    let sender_digits = strip_hex_prefix(sender);
    let sender_bytes: [u8; 20] = hex::decode(sender_digits)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| CodecError::InvalidHex { field: "from", value: sender.to_string() })?;

    let nonce_digits = strip_hex_prefix(nonce);
    let padded = if nonce_digits.len() % 2 == 1 {
        format!("0{nonce_digits}")
    } else {
        nonce_digits.to_string()
    };
    let nonce_bytes = hex::decode(&padded)
        .map_err(|_| CodecError::InvalidHex { field: "nonce", value: nonce.to_string() })?;
    let leading_zeros = nonce_bytes.iter().take_while(|byte| **byte == 0).count();

    Ok(create_address(Address::from(sender_bytes), &nonce_bytes[leading_zeros..]))
}

/// Derives the contract address for `sender` and an integer `nonce`.
pub fn contract_address_for_nonce(sender: Address, nonce: u64) -> Address {
    let bytes = nonce.to_be_bytes();
    let leading_zeros = bytes.iter().take_while(|byte| **byte == 0).count();
    create_address(sender, &bytes[leading_zeros..])
}

/// Hashes `rlp([sender, nonce])` and keeps the low 20 bytes.
///
/// `nonce` must already be the minimal big-endian encoding of the integer.
pub fn create_address(sender: Address, nonce: &[u8]) -> Address {
    let payload_length = sender.length() + nonce.length();
    let mut encoded = Vec::with_capacity(payload_length + 1);
    Header { list: true, payload_length }.encode(&mut encoded);
    sender.encode(&mut encoded);
    nonce.encode(&mut encoded);
    Address::from_word(keccak256(&encoded))
}
