//! SHA-256 hashing implementation
//!
//! Block digests are compared byte-for-byte across nodes, so the preimage
//! layout here is part of the network protocol.

use sha2::{Digest, Sha256};

use crate::consensus::BlockData;

/// Hash arbitrary bytes with SHA-256, returning lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compute the digest of a block candidate
///
/// Preimage is `previous_block_hash ++ nonce (decimal) ++ json(block_data)`.
pub fn hash_block(previous_block_hash: &str, block_data: &BlockData, nonce: u64) -> String {
    let payload = serde_json::to_string(block_data)
        .expect("block payload always serializes to JSON");

    let mut hasher = Sha256::new();
    hasher.update(previous_block_hash.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Transaction;

    fn sample_data() -> BlockData {
        BlockData {
            transactions: vec![Transaction::with_id("t1", 10.0, "A", "B")],
            index: 2,
        }
    }

    #[test]
    fn test_hash_deterministic() {
        let data = sample_data();
        assert_eq!(hash_block("0", &data, 7), hash_block("0", &data, 7));
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = hash_block("0", &sample_data(), 0);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_matches_preimage_layout() {
        let data = sample_data();
        let preimage = format!(
            "abc42{}",
            r#"{"transactions":[{"transactionId":"t1","amount":10,"sender":"A","recipient":"B"}],"index":2}"#
        );
        assert_eq!(hash_block("abc", &data, 42), sha256_hex(preimage.as_bytes()));
    }

    #[test]
    fn test_small_amount_preimage_uses_plain_decimal() {
        let data = BlockData {
            transactions: vec![Transaction::with_id("t1", 0.000001, "A", "B")],
            index: 2,
        };
        let preimage = format!(
            "0{}",
            r#"1{"transactions":[{"transactionId":"t1","amount":0.000001,"sender":"A","recipient":"B"}],"index":2}"#
        );
        assert_eq!(hash_block("0", &data, 1), sha256_hex(preimage.as_bytes()));
    }

    #[test]
    fn test_nonce_changes_hash() {
        let data = sample_data();
        assert_ne!(hash_block("0", &data, 1), hash_block("0", &data, 2));
    }

    #[test]
    fn test_previous_hash_changes_hash() {
        let data = sample_data();
        assert_ne!(hash_block("a", &data, 1), hash_block("b", &data, 1));
    }

    #[test]
    fn test_known_sha256_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
