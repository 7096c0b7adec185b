//! Block miner implementation
//!
//! Searches nonce space for a digest meeting the fixed difficulty, then
//! appends the block to the ledger. The search is unbounded and blocking;
//! async callers must run it on a blocking thread.

use log::{debug, info};

use crate::consensus::{meets_difficulty, Block, BlockData};
use crate::crypto::hash_block;
use crate::storage::Ledger;

/// Attempts between progress reports while mining
const PROGRESS_INTERVAL: u64 = 100_000;

/// Find the first nonce, counting up from 0, whose digest meets the target
pub fn proof_of_work(previous_block_hash: &str, block_data: &BlockData) -> u64 {
    proof_of_work_with_progress(previous_block_hash, block_data, u64::MAX, |_| {})
}

/// Proof of work with a callback every `progress_interval` failed attempts
pub fn proof_of_work_with_progress<F>(
    previous_block_hash: &str,
    block_data: &BlockData,
    progress_interval: u64,
    mut callback: F,
) -> u64
where
    F: FnMut(u64), // attempts so far
{
    let mut nonce = 0u64;

    loop {
        let hash = hash_block(previous_block_hash, block_data, nonce);
        if meets_difficulty(&hash) {
            return nonce;
        }

        nonce += 1;

        if nonce % progress_interval == 0 {
            callback(nonce);
        }
    }
}

/// Mine the pending pool into a new block and append it
///
/// The pool is hashed as it stands and then moved into the block, so the
/// caller must hold exclusive access for the whole call. The digest covers
/// the index the block builder assigns, whatever index the tip carries.
pub fn mine_block(ledger: &mut Ledger) -> Block {
    let previous_block_hash = ledger.last_block().hash.clone();
    let block_data = BlockData {
        transactions: ledger.pending_transactions().to_vec(),
        index: ledger.next_index(),
    };
    debug!("Mining block {} on top of {}", block_data.index, previous_block_hash);

    let nonce = proof_of_work_with_progress(
        &previous_block_hash,
        &block_data,
        PROGRESS_INTERVAL,
        |attempts| debug!("Still mining block {}: {} attempts", block_data.index, attempts),
    );
    let hash = hash_block(&previous_block_hash, &block_data, nonce);
    debug!("Found nonce {} with hash {}", nonce, hash);

    let block = ledger.create_block(nonce, previous_block_hash, hash);
    info!(
        "Mined block #{} with {} transaction(s), hash {}",
        block.index,
        block.transactions.len(),
        block.hash
    );
    block
}
