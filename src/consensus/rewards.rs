//! Mining reward
//!
//! The node that mines a block may pay itself a fixed reward. The reward is
//! an ordinary pending transaction from a reserved sender, so it lands in
//! the *next* block.

use crate::constants::{MINING_REWARD, REWARD_SENDER};
use crate::validation::Transaction;

/// Build the reward transaction for a miner
pub fn reward_transaction(miner_address: &str) -> Transaction {
    Transaction::new(MINING_REWARD, REWARD_SENDER, miner_address)
}
