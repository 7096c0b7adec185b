//! Pending transaction pool
//!
//! Transactions wait here, in arrival order, until the next block is
//! created. The pool performs no validation of its own.

use serde::{Deserialize, Serialize};
use crate::validation::Transaction;

/// Ordered pool of transactions not yet in any block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionPool {
    transactions: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction, preserving arrival order
    pub fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Take every pending transaction, leaving the pool empty
    pub fn drain(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.transactions)
    }

    /// Replace the whole pool (used when adopting a peer's chain)
    pub fn replace(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
