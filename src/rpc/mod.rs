//! HTTP API Module
//!
//! Exposes the ledger to clients and peers as JSON over HTTP.

mod error;
mod methods;
mod server;

pub use error::*;
pub use methods::*;
pub use server::*;
