//! Chain state management
//!
//! A node's whole ledger: the chain, the pending pool, the node's identity
//! and its peer registry. Every operation is a synchronous state
//! transition; callers serialize access.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consensus::{validate_next_block, Block, ValidationError};
use crate::node::{create_genesis_block, NodeIdentity};
use crate::p2p::{BulkRegistration, PeerRegistry};
use crate::validation::Transaction;
use super::TransactionPool;

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Transactions touching an address and its resulting balance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressData {
    pub address_transactions: Vec<Transaction>,
    pub balance: f64,
}

/// Complete ledger state of one node
///
/// Serializes to the snapshot peers fetch during consensus.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    chain: Vec<Block>,
    #[serde(rename = "pendingTransactions")]
    pending: TransactionPool,
    #[serde(flatten)]
    identity: NodeIdentity,
    #[serde(rename = "networkNodes")]
    peers: PeerRegistry,
}

impl Ledger {
    /// Create a ledger seeded with the genesis block and an empty pool
    pub fn new(address: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_identity(NodeIdentity::new(address, url))
    }

    pub fn with_identity(identity: NodeIdentity) -> Self {
        Self {
            chain: vec![create_genesis_block(now_millis())],
            pending: TransactionPool::new(),
            identity,
            peers: PeerRegistry::new(),
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        self.pending.as_slice()
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    pub fn peers(&self) -> &PeerRegistry {
        &self.peers
    }

    /// Tip of the chain
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds at least the genesis block")
    }

    /// Queue a transaction for the next block
    ///
    /// Returns the index of the block the transaction will be mined into.
    pub fn add_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.last_block().index.saturating_add(1)
    }

    /// Index the block builder gives the next block
    pub fn next_index(&self) -> u64 {
        self.chain.len() as u64 + 1
    }

    /// Append a block built from the whole pending pool
    ///
    /// The nonce and hash are trusted as given; nothing is recomputed here.
    pub fn create_block(&mut self, nonce: u64, previous_block_hash: String, hash: String) -> Block {
        let block = Block {
            index: self.next_index(),
            timestamp: now_millis(),
            transactions: self.pending.drain(),
            nonce,
            hash,
            previous_block_hash,
        };
        self.chain.push(block.clone());
        block
    }

    /// Append a block pushed by a peer if it extends our tip
    ///
    /// On acceptance the pending pool is cleared; on rejection nothing changes.
    pub fn accept_block(&mut self, block: Block) -> Result<(), ValidationError> {
        validate_next_block(self.last_block(), &block)?;
        self.chain.push(block);
        self.pending.clear();
        Ok(())
    }

    /// Replace chain and pool wholesale; local-only state is discarded
    pub fn replace_chain(&mut self, chain: Vec<Block>, pending: Vec<Transaction>) {
        self.chain = chain;
        self.pending.replace(pending);
    }

    /// Find a block by its hash
    pub fn get_block(&self, hash: &str) -> Option<&Block> {
        self.chain.iter().find(|block| block.hash == hash)
    }

    /// Find a mined transaction and the block containing it
    ///
    /// Should an id occur more than once, the latest occurrence wins.
    pub fn get_transaction(&self, transaction_id: &str) -> Option<(&Transaction, &Block)> {
        self.chain.iter().rev().find_map(|block| {
            block
                .find_transaction(transaction_id)
                .map(|tx| (tx, block))
        })
    }

    /// Mined transactions involving `address` and its net balance
    ///
    /// Pending transactions do not count towards the balance.
    pub fn address_data(&self, address: &str) -> AddressData {
        let address_transactions: Vec<Transaction> = self
            .chain
            .iter()
            .flat_map(|block| block.transactions.iter())
            .filter(|tx| tx.involves(address))
            .cloned()
            .collect();

        let balance = address_transactions.iter().fold(0.0, |mut balance, tx| {
            if tx.recipient == address {
                balance += tx.amount;
            }
            if tx.sender == address {
                balance -= tx.amount;
            }
            balance
        });

        AddressData {
            address_transactions,
            balance,
        }
    }

    /// Register one peer; known URLs and our own URL are a no-op
    pub fn register_peer(&mut self, url: &str) -> bool {
        self.peers.register(url, &self.identity.url)
    }

    /// Register several peers at once
    pub fn register_peers<I, S>(&mut self, urls: I) -> BulkRegistration
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.peers.register_many(urls, &self.identity.url)
    }
}
