//! Longest-valid-chain consensus
//!
//! Divergence between nodes is resolved by adopting the longest chain any
//! peer reports, provided it validates. Adoption replaces the local chain
//! and pending pool wholesale; there is no merge.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::consensus::{validate_chain, Block};
use crate::storage::Ledger;
use crate::validation::Transaction;

/// Chain and pending pool as reported by one peer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerChain {
    pub chain: Vec<Block>,
    #[serde(default)]
    pub pending_transactions: Vec<Transaction>,
}

/// What a consensus round did to the local ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusOutcome {
    /// A longer valid chain was adopted
    Replaced { length: usize },
    /// No peer had a strictly longer chain
    NoLongerChain,
    /// The longest candidate failed validation
    InvalidCandidate { length: usize },
}

impl ConsensusOutcome {
    pub fn replaced(&self) -> bool {
        matches!(self, ConsensusOutcome::Replaced { .. })
    }
}

/// Pick the strictly longest peer chain
///
/// Only a strictly longer chain displaces the current best, so on a tie the
/// first one seen wins and the local chain wins over any equal-length peer.
pub fn select_longest<I>(local_length: usize, peer_chains: I) -> Option<PeerChain>
where
    I: IntoIterator<Item = PeerChain>,
{
    let mut max_length = local_length;
    let mut winner = None;

    for candidate in peer_chains {
        if candidate.chain.len() > max_length {
            debug!("Found a longer chain of length {}", candidate.chain.len());
            max_length = candidate.chain.len();
            winner = Some(candidate);
        }
    }

    winner
}

/// Run one consensus round against already-fetched peer chains
pub fn resolve<I>(ledger: &mut Ledger, peer_chains: I) -> ConsensusOutcome
where
    I: IntoIterator<Item = PeerChain>,
{
    let Some(winner) = select_longest(ledger.chain().len(), peer_chains) else {
        debug!("No peer has a longer chain; keeping local chain");
        return ConsensusOutcome::NoLongerChain;
    };

    let length = winner.chain.len();
    if let Err(e) = validate_chain(&winner.chain) {
        warn!("Longest peer chain (length {}) rejected: {}", length, e);
        return ConsensusOutcome::InvalidCandidate { length };
    }

    info!("Replacing local chain with longer valid chain of length {}", length);
    ledger.replace_chain(winner.chain, winner.pending_transactions);
    ConsensusOutcome::Replaced { length }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mining::mine_block;

    fn ledger_with_blocks(blocks: usize) -> Ledger {
        let mut ledger = Ledger::new("node", "http://localhost:3001");
        for i in 0..blocks {
            ledger.add_transaction(Transaction::with_id(format!("t{i}"), 1.0, "A", "B"));
            mine_block(&mut ledger);
        }
        ledger
    }

    fn peer_of(ledger: &Ledger) -> PeerChain {
        PeerChain {
            chain: ledger.chain().to_vec(),
            pending_transactions: ledger.pending_transactions().to_vec(),
        }
    }

    #[test]
    fn test_adopts_longer_valid_chain_and_pool() {
        let mut local = ledger_with_blocks(1);
        let mut remote = ledger_with_blocks(2);
        remote.add_transaction(Transaction::with_id("pending", 3.0, "C", "D"));
        local.add_transaction(Transaction::with_id("local-only", 1.0, "X", "Y"));

        let outcome = resolve(&mut local, vec![peer_of(&remote)]);

        assert_eq!(outcome, ConsensusOutcome::Replaced { length: 3 });
        assert_eq!(local.chain(), remote.chain());
        assert_eq!(local.pending_transactions().len(), 1);
        assert_eq!(local.pending_transactions()[0].transaction_id, "pending");
    }

    #[test]
    fn test_rejects_longer_invalid_chain() {
        let mut local = ledger_with_blocks(1);
        let before = local.chain().to_vec();

        let mut bad = peer_of(&ledger_with_blocks(2));
        bad.chain[1].previous_block_hash = "forged".into();

        let outcome = resolve(&mut local, vec![bad]);

        assert_eq!(outcome, ConsensusOutcome::InvalidCandidate { length: 3 });
        assert_eq!(local.chain(), before.as_slice());
    }

    #[test]
    fn test_equal_length_does_not_replace() {
        let mut local = ledger_with_blocks(1);
        let other = ledger_with_blocks(1);

        let outcome = resolve(&mut local, vec![peer_of(&other)]);
        assert_eq!(outcome, ConsensusOutcome::NoLongerChain);
    }

    #[test]
    fn test_first_longest_wins_ties() {
        let a = peer_of(&ledger_with_blocks(2));
        let mut b = peer_of(&ledger_with_blocks(2));
        b.pending_transactions.push(Transaction::with_id("b-only", 1.0, "A", "B"));

        let winner = select_longest(1, vec![a.clone(), b]).unwrap();
        assert_eq!(winner.chain, a.chain);
        assert!(winner.pending_transactions.is_empty());
    }

    #[test]
    fn test_strictly_longer_later_chain_overrides() {
        let short = peer_of(&ledger_with_blocks(1));
        let long = peer_of(&ledger_with_blocks(2));

        let winner = select_longest(1, vec![short, long.clone()]).unwrap();
        assert_eq!(winner.chain.len(), long.chain.len());
    }

    #[test]
    fn test_no_peers() {
        let mut local = ledger_with_blocks(0);
        assert_eq!(resolve(&mut local, Vec::new()), ConsensusOutcome::NoLongerChain);
    }
}
