//! P2P networking module - peer registry, wire messages and the outbound client

mod client;
mod peer;
mod protocol;

pub use client::*;
pub use peer::*;
pub use protocol::*;
