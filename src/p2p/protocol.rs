//! P2P protocol messages
//!
//! JSON payloads exchanged between nodes and the routes they travel on.
//! Field names are part of the wire contract.

use serde::{Deserialize, Serialize};
use crate::consensus::Block;

/// Ledger snapshot of a node
pub const CHAIN_PATH: &str = "/blockchain";
/// Mine the pending pool
pub const MINE_PATH: &str = "/blockchain/block/mine";
/// Look a block up by hash
pub const BLOCK_PATH: &str = "/blockchain/block/:block_hash";
/// Push a freshly mined block to a peer
pub const RECEIVE_BLOCK_PATH: &str = "/blockchain/receive-new-block";
/// Run consensus against all peers
pub const CONSENSUS_PATH: &str = "/blockchain/consensus";
/// Relay a transaction into a peer's pool
pub const TRANSACTION_PATH: &str = "/blockchain/transaction";
/// Create a transaction and relay it everywhere
pub const BROADCAST_TRANSACTION_PATH: &str = "/blockchain/transaction/broadcast";
/// Look a transaction up by id
pub const TRANSACTION_LOOKUP_PATH: &str = "/blockchain/transaction/:transaction_id";
/// Transactions and balance of an address
pub const ADDRESS_PATH: &str = "/blockchain/address/:address";
/// Register a node and introduce it to the whole network
pub const REGISTER_AND_BROADCAST_PATH: &str = "/blockchain/register-and-broadcast-node";
/// Register a single node
pub const REGISTER_NODE_PATH: &str = "/blockchain/register-node";
/// Register many nodes at once
pub const REGISTER_BULK_PATH: &str = "/blockchain/register-bulk-nodes";

/// Block announcement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlockMessage {
    pub new_block: Option<Block>,
}

/// Single node registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNodeMessage {
    pub new_node_url: Option<String>,
}

/// Bulk node registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBulkMessage {
    #[serde(alias = "allNetworkNodes")]
    pub node_urls: Option<Vec<String>>,
}

/// Transaction relayed from a peer; the id is assigned by the originator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayedTransaction {
    pub transaction_id: Option<String>,
    pub amount: f64,
    pub sender: String,
    pub recipient: String,
}

/// Request to create and broadcast a new transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastTransactionMessage {
    #[serde(default)]
    pub is_reward_transaction: bool,
    pub amount: Option<f64>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
}
