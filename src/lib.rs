//! Replicated proof-of-work ledger
//!
//! Every node keeps an append-only chain of blocks and a pool of pending
//! transactions, mines blocks by brute-force proof-of-work and converges
//! with its peers by adopting the longest chain that validates.

pub mod config;
pub mod consensus;
pub mod crypto;
pub mod validation;
pub mod storage;
pub mod p2p;
pub mod mining;
pub mod node;
pub mod rpc;

/// Protocol constants - shared by every node on the network
pub mod constants {
    /// Number of leading zero hex characters a block digest needs
    pub const DIFFICULTY: usize = 4;

    /// Nonce of the synthetic genesis block
    pub const GENESIS_NONCE: u64 = 100;

    /// Hash and previous hash of the genesis block
    pub const GENESIS_HASH: &str = "0";

    /// Amount paid to a miner per block
    pub const MINING_REWARD: f64 = 12.5;

    /// Reserved sender id of reward transactions
    pub const REWARD_SENDER: &str = "00";
}
