//! Proof-of-work difficulty predicate
//!
//! Difficulty is fixed: a block digest must open with `DIFFICULTY` zero
//! hex characters. There is no retargeting.

use crate::constants::DIFFICULTY;

/// Whether a hex digest satisfies the proof-of-work target
pub fn meets_difficulty(hash: &str) -> bool {
    hash.len() >= DIFFICULTY && hash.bytes().take(DIFFICULTY).all(|b| b == b'0')
}
