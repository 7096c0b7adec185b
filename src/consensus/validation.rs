//! Block and chain validation
//!
//! Pure functions for validating blocks and chains.

use crate::consensus::{meets_difficulty, Block};
use crate::constants::{GENESIS_HASH, GENESIS_NONCE};
use thiserror::Error;

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Chain is empty")]
    EmptyChain,
    #[error("Invalid genesis block")]
    InvalidGenesis,
    #[error("Invalid previous hash at block {0}")]
    InvalidPrevHash(u64),
    #[error("Invalid proof of work at block {0}")]
    InvalidPoW(u64),
    #[error("Invalid block index: expected {expected}, got {actual}")]
    InvalidIndex { expected: u64, actual: u64 },
    #[error("Block index {0} has no successor")]
    IndexOverflow(u64),
}

/// Check the synthetic genesis block's sentinel values
pub fn validate_genesis(block: &Block) -> Result<(), ValidationError> {
    let sentinel = block.nonce == GENESIS_NONCE
        && block.previous_block_hash == GENESIS_HASH
        && block.hash == GENESIS_HASH
        && block.transactions.is_empty();

    if !sentinel {
        return Err(ValidationError::InvalidGenesis);
    }

    Ok(())
}

/// Validate the link and proof of work of `block` on top of `prev`
pub fn validate_link(prev: &Block, block: &Block) -> Result<(), ValidationError> {
    if block.previous_block_hash != prev.hash {
        return Err(ValidationError::InvalidPrevHash(block.index));
    }

    // The digest is recomputed over the predecessor's hash, not over the
    // block's own claimed previous hash.
    if !meets_difficulty(&block.compute_hash(&prev.hash)) {
        return Err(ValidationError::InvalidPoW(block.index));
    }

    Ok(())
}

/// Validate a whole chain
///
/// Every non-genesis block must link to its predecessor and carry valid
/// proof of work; the genesis block must hold its sentinel values. Returns
/// the first failure found.
pub fn validate_chain(chain: &[Block]) -> Result<(), ValidationError> {
    let genesis = chain.first().ok_or(ValidationError::EmptyChain)?;

    for pair in chain.windows(2) {
        validate_link(&pair[0], &pair[1])?;
    }

    validate_genesis(genesis)
}

/// Whether a chain passes full validation
pub fn is_valid(chain: &[Block]) -> bool {
    validate_chain(chain).is_ok()
}

/// Check a block pushed by a peer against our current tip
///
/// Only the link and the index are checked; proof of work is left to
/// consensus-time validation.
pub fn validate_next_block(last: &Block, block: &Block) -> Result<(), ValidationError> {
    if block.previous_block_hash != last.hash {
        return Err(ValidationError::InvalidPrevHash(block.index));
    }

    let expected = last
        .index
        .checked_add(1)
        .ok_or(ValidationError::IndexOverflow(last.index))?;
    if block.index != expected {
        return Err(ValidationError::InvalidIndex {
            expected,
            actual: block.index,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::mine_block;
    use crate::storage::Ledger;
    use crate::validation::Transaction;

    fn mined_chain(blocks: usize) -> Vec<Block> {
        let mut ledger = Ledger::new("node-a", "http://localhost:3001");
        for i in 0..blocks {
            ledger.add_transaction(Transaction::with_id(format!("t{i}"), 10.0, "A", "B"));
            mine_block(&mut ledger);
        }
        ledger.chain().to_vec()
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        assert!(is_valid(&mined_chain(0)));
    }

    #[test]
    fn test_mined_chain_is_valid() {
        assert_eq!(validate_chain(&mined_chain(2)), Ok(()));
    }

    #[test]
    fn test_empty_chain_is_invalid() {
        assert_eq!(validate_chain(&[]), Err(ValidationError::EmptyChain));
    }

    #[test]
    fn test_broken_link_is_invalid() {
        let mut chain = mined_chain(2);
        chain[2].previous_block_hash = "deadbeef".into();
        assert_eq!(validate_chain(&chain), Err(ValidationError::InvalidPrevHash(3)));
    }

    #[test]
    fn test_tampered_transactions_fail_pow() {
        let mut chain = mined_chain(1);
        chain[1].transactions[0].amount = 1_000.0;
        assert_eq!(validate_chain(&chain), Err(ValidationError::InvalidPoW(2)));
    }

    #[test]
    fn test_tampered_genesis_is_invalid() {
        let mut chain = mined_chain(0);
        chain[0].nonce = 0;
        assert_eq!(validate_chain(&chain), Err(ValidationError::InvalidGenesis));

        let mut chain = mined_chain(0);
        chain[0].transactions.push(Transaction::new(1.0, "A", "B"));
        assert!(!is_valid(&chain));
    }

    #[test]
    fn test_next_block_checks() {
        let chain = mined_chain(1);
        let (genesis, block) = (&chain[0], &chain[1]);

        assert_eq!(validate_next_block(genesis, block), Ok(()));
        assert_eq!(
            validate_next_block(block, block),
            Err(ValidationError::InvalidPrevHash(2))
        );

        let mut wrong_index = block.clone();
        wrong_index.index = 5;
        assert_eq!(
            validate_next_block(genesis, &wrong_index),
            Err(ValidationError::InvalidIndex { expected: 2, actual: 5 })
        );
    }

    #[test]
    fn test_next_block_after_max_index() {
        let chain = mined_chain(1);
        let mut last = chain[1].clone();
        last.index = u64::MAX;

        let mut next = chain[1].clone();
        next.previous_block_hash = last.hash.clone();

        assert_eq!(
            validate_next_block(&last, &next),
            Err(ValidationError::IndexOverflow(u64::MAX))
        );
    }
}
