//! Index settings and field mappings used when provisioning indices.

use crate::RecordKind;
use serde_json::{Value, json};

fn properties(kind: RecordKind) -> Value {
    match kind {
        RecordKind::Block => json!({
            "number": { "type": "long" },
            "hash": { "type": "keyword" },
            "parentHash": { "type": "keyword" },
            "miner": { "type": "keyword" },
            "timestamp": { "type": "date", "format": "epoch_millis" },
            "size": { "type": "long" },
            "gasLimit": { "type": "long" },
            "gasUsed": { "type": "long" },
            "difficulty": { "type": "double" },
            "totalDifficulty": { "type": "double" },
            "numTransactions": { "type": "integer" },
            "numUncles": { "type": "integer" },
            "scaleRevision": { "type": "short" },
        }),
        RecordKind::Transaction => json!({
            "hash": { "type": "keyword" },
            "blockNumber": { "type": "long" },
            "transactionIndex": { "type": "integer" },
            "from": { "type": "keyword" },
            "to": { "type": "keyword" },
            "value": { "type": "double" },
            "gas": { "type": "long" },
            "gasPrice": { "type": "long" },
            "nonce": { "type": "long" },
            "input": { "type": "keyword", "index": false, "doc_values": false },
            "timestamp": { "type": "date", "format": "epoch_millis" },
            "scaleRevision": { "type": "short" },
        }),
        RecordKind::Contract => json!({
            "address": { "type": "keyword" },
            "creator": { "type": "keyword" },
            "nonce": { "type": "long" },
            "transactionHash": { "type": "keyword" },
            "blockNumber": { "type": "long" },
            "transactionIndex": { "type": "integer" },
            "timestamp": { "type": "date", "format": "epoch_millis" },
            "value": { "type": "double" },
            "inputHash": { "type": "keyword" },
            "inputLength": { "type": "long" },
            "balance": { "type": "double" },
            "code": { "type": "keyword", "index": false, "doc_values": false },
            "codeHash": { "type": "keyword" },
            "codeLength": { "type": "long" },
            "scaleRevision": { "type": "short" },
        }),
    }
}

/// Returns the index creation body for `kind`.
pub fn index_body(kind: RecordKind, shards: u32, replicas: u32) -> Value {
    json!({
        "settings": {
            "number_of_shards": shards,
            "number_of_replicas": replicas,
        },
        "mappings": {
            "dynamic": "strict",
            "properties": properties(kind),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_fields_are_numeric() {
        for kind in [RecordKind::Transaction, RecordKind::Contract] {
            let body = index_body(kind, 1, 0);
            assert_eq!(body["mappings"]["properties"]["blockNumber"]["type"], "long");
        }
        assert_eq!(index_body(RecordKind::Block, 3, 1)["settings"]["number_of_shards"], 3);
    }
}
