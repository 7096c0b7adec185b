//! Peer management
//!
//! Peers are identified by their base URL. The registry is ordered by
//! registration time and never holds duplicates or the node's own URL.

use serde::Serialize;

/// Result of a bulk registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRegistration {
    /// URLs newly added to the registry
    pub registered_nodes: Vec<String>,
    /// URLs skipped because they were known or referred to this node
    pub rejected_nodes: Vec<String>,
}

/// Registry of known peer URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PeerRegistry {
    urls: Vec<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer URL
    ///
    /// Returns `false`, without error, when the URL is already known or is
    /// `self_url`.
    pub fn register(&mut self, url: &str, self_url: &str) -> bool {
        if url == self_url || self.contains(url) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }

    /// Register many peer URLs at once
    pub fn register_many<I, S>(&mut self, urls: I, self_url: &str) -> BulkRegistration
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outcome = BulkRegistration::default();
        for url in urls {
            let url = url.as_ref();
            if self.register(url, self_url) {
                outcome.registered_nodes.push(url.to_string());
            } else {
                outcome.rejected_nodes.push(url.to_string());
            }
        }
        outcome
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    /// All known peers in registration order
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
