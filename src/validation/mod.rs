//! Transaction model - ledger entries moved between the pool and blocks

mod transaction;

pub use transaction::*;
