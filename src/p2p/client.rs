//! Outbound peer client
//!
//! Fire-and-forget HTTP calls to other nodes. Broadcasts fan out to every
//! peer concurrently and settle all calls before returning; a failing peer
//! is reported, never retried.

use std::time::Duration;

use futures::future::join_all;
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::consensus::{Block, PeerChain};
use crate::p2p::{
    NewBlockMessage, RegisterBulkMessage, RegisterNodeMessage, CHAIN_PATH, CONSENSUS_PATH,
    RECEIVE_BLOCK_PATH, REGISTER_BULK_PATH, REGISTER_NODE_PATH, TRANSACTION_PATH,
};
use crate::validation::Transaction;

/// Errors talking to a peer
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Peer {url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Outcome of a broadcast to a set of peers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed_peers: Vec<String>,
}

impl BroadcastReport {
    pub fn all_delivered(&self) -> bool {
        self.failed_peers.is_empty()
    }
}

/// HTTP client for node-to-node calls
#[derive(Debug, Clone)]
pub struct PeerClient {
    client: Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: String, body: &T) -> Result<(), PeerError> {
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| PeerError::Http { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Status { url, status: status.as_u16() });
        }
        Ok(())
    }

    async fn get(&self, url: String) -> Result<reqwest::Response, PeerError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| PeerError::Http { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Status { url, status: status.as_u16() });
        }
        Ok(response)
    }

    /// POST `body` to `path` on every peer and wait for all of them
    async fn broadcast<T: Serialize + Sync + ?Sized>(
        &self,
        peers: &[String],
        path: &str,
        body: &T,
    ) -> BroadcastReport {
        let calls = peers.iter().map(|peer| async move {
            let result = self.post_json(format!("{peer}{path}"), body).await;
            (peer, result)
        });

        let mut report = BroadcastReport::default();
        for (peer, result) in join_all(calls).await {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!("Broadcast to {} failed: {}", peer, e);
                    report.failed_peers.push(peer.clone());
                }
            }
        }
        report
    }

    /// Announce a newly mined block
    pub async fn broadcast_block(&self, peers: &[String], block: &Block) -> BroadcastReport {
        debug!("Broadcasting block {} to {} peer(s)", block.index, peers.len());
        let message = NewBlockMessage { new_block: Some(block.clone()) };
        self.broadcast(peers, RECEIVE_BLOCK_PATH, &message).await
    }

    /// Relay a transaction into every peer's pending pool
    pub async fn broadcast_transaction(&self, peers: &[String], tx: &Transaction) -> BroadcastReport {
        debug!("Broadcasting transaction {} to {} peer(s)", tx.transaction_id, peers.len());
        self.broadcast(peers, TRANSACTION_PATH, tx).await
    }

    /// Tell every peer about a new node
    pub async fn broadcast_registration(&self, peers: &[String], new_node_url: &str) -> BroadcastReport {
        let message = RegisterNodeMessage { new_node_url: Some(new_node_url.to_string()) };
        self.broadcast(peers, REGISTER_NODE_PATH, &message).await
    }

    /// Hand a node the full list of network members
    pub async fn register_bulk(&self, target: &str, node_urls: Vec<String>) -> Result<(), PeerError> {
        let message = RegisterBulkMessage { node_urls: Some(node_urls) };
        self.post_json(format!("{target}{REGISTER_BULK_PATH}"), &message).await
    }

    /// Ask a node to run a consensus round
    pub async fn request_consensus(&self, target: &str) -> Result<(), PeerError> {
        self.get(format!("{target}{CONSENSUS_PATH}")).await.map(|_| ())
    }

    /// Fetch a peer's chain and pending pool
    pub async fn fetch_chain(&self, peer: &str) -> Result<PeerChain, PeerError> {
        let url = format!("{peer}{CHAIN_PATH}");
        let response = self.get(url.clone()).await?;
        response
            .json::<PeerChain>()
            .await
            .map_err(|source| PeerError::Http { url, source })
    }

    /// Fetch every peer's chain, skipping peers that fail
    pub async fn fetch_chains(&self, peers: &[String]) -> Vec<PeerChain> {
        let fetches = peers.iter().map(|peer| async move { (peer, self.fetch_chain(peer).await) });

        join_all(fetches)
            .await
            .into_iter()
            .filter_map(|(peer, result)| match result {
                Ok(chain) => Some(chain),
                Err(e) => {
                    warn!("Could not fetch chain from {}: {}", peer, e);
                    None
                }
            })
            .collect()
    }
}
