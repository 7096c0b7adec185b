//! Block structure for the ledger
//!
//! Blocks are plain records; the digest in `hash` is produced by the miner
//! and only re-checked by chain validation.

use serde::{Deserialize, Serialize};
use crate::crypto::hash_block;
use crate::validation::Transaction;

/// The part of a block covered by its digest
///
/// Field order is significant: the digest is taken over this struct's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    /// Transactions in arrival order
    pub transactions: Vec<Transaction>,
    /// Position of the block in the chain (genesis = 1)
    pub index: u64,
}

/// A complete block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain, starting at 1
    pub index: u64,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Transactions drained from the pending pool
    pub transactions: Vec<Transaction>,
    /// Proof-of-work nonce
    pub nonce: u64,
    /// Digest of this block
    pub hash: String,
    /// Digest of the preceding block ("0" for genesis)
    pub previous_block_hash: String,
}

impl Block {
    /// Payload the digest is computed over
    pub fn data(&self) -> BlockData {
        BlockData {
            transactions: self.transactions.clone(),
            index: self.index,
        }
    }

    /// Recompute this block's digest on top of `previous_hash`
    pub fn compute_hash(&self, previous_hash: &str) -> String {
        hash_block(previous_hash, &self.data(), self.nonce)
    }

    /// Find a transaction by id
    pub fn find_transaction(&self, transaction_id: &str) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|tx| tx.transaction_id == transaction_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block {
            index: 2,
            timestamp: 1_700_000_000_000,
            transactions: vec![Transaction::with_id("t1", 10.0, "A", "B")],
            nonce: 5,
            hash: "abc".into(),
            previous_block_hash: "0".into(),
        }
    }

    #[test]
    fn test_block_wire_field_names() {
        let json = serde_json::to_value(sample_block()).unwrap();
        assert!(json.get("previousBlockHash").is_some());
        assert!(json.get("previous_block_hash").is_none());
        assert_eq!(json["index"], 2);
        assert_eq!(json["transactions"][0]["transactionId"], "t1");
    }

    #[test]
    fn test_block_data_serializes_transactions_first() {
        let data = sample_block().data();
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.starts_with(r#"{"transactions":["#));
        assert!(json.ends_with(r#""index":2}"#));
    }

    #[test]
    fn test_compute_hash_uses_nonce_and_payload() {
        let block = sample_block();
        assert_eq!(block.compute_hash("0"), hash_block("0", &block.data(), 5));
    }

    #[test]
    fn test_find_transaction() {
        let block = sample_block();
        assert!(block.find_transaction("t1").is_some());
        assert!(block.find_transaction("t2").is_none());
    }
}
