//! Consensus module - Block structure, validation, difficulty, rewards and chain selection

mod block;
mod validation;
mod difficulty;
mod rewards;
mod resolver;

pub use block::*;
pub use validation::*;
pub use difficulty::*;
pub use rewards::*;
pub use resolver::*;
