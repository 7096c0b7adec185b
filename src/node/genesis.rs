//! Genesis block generation
//!
//! The genesis block is synthetic: it is never mined and carries fixed
//! sentinel values that chain validation checks for.

use crate::consensus::Block;
use crate::constants::{GENESIS_HASH, GENESIS_NONCE};

/// Create the genesis block, stamped with the given creation time
///
/// Only the timestamp differs between nodes; validation ignores it.
pub fn create_genesis_block(timestamp: u64) -> Block {
    Block {
        index: 1,
        timestamp,
        transactions: Vec::new(),
        nonce: GENESIS_NONCE,
        hash: GENESIS_HASH.to_string(),
        previous_block_hash: GENESIS_HASH.to_string(),
    }
}
