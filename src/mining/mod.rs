//! Mining module - proof-of-work search and block assembly

mod miner;

pub use miner::*;
