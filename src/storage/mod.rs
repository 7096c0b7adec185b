//! Storage module - in-memory chain state and pending pool

mod pool;
mod state;

pub use pool::*;
pub use state::*;
