//! Node identity
//!
//! A node is known to its peers by its public URL and to the ledger by its
//! address, which receives mining rewards.

use serde::Serialize;
use crate::validation::generate_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeIdentity {
    /// Public base URL peers use to reach this node
    #[serde(rename = "currentNodeUrl")]
    pub url: String,
    /// Ledger address that mining rewards are paid to
    #[serde(rename = "currentNodeAddress")]
    pub address: String,
}

impl NodeIdentity {
    pub fn new(address: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            address: address.into(),
        }
    }

    /// Identity with a freshly generated address
    pub fn generate(url: impl Into<String>) -> Self {
        Self::new(generate_id(), url)
    }
}
