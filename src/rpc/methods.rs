//! HTTP method implementations
//!
//! Each handler is a thin adapter: take the ledger lock, call into the
//! engine, release the lock, then talk to peers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::consensus::{reward_transaction, resolve, Block, ConsensusOutcome};
use crate::mining::mine_block;
use crate::p2p::{
    BroadcastReport, BroadcastTransactionMessage, NewBlockMessage, PeerClient,
    RegisterBulkMessage, RegisterNodeMessage, RelayedTransaction,
};
use crate::rpc::ApiError;
use crate::storage::{AddressData, Ledger};
use crate::validation::Transaction;

type ApiResult<T> = Result<T, ApiError>;

/// Shared handler state
pub struct NodeState {
    /// One mutation in flight per node
    pub ledger: Arc<Mutex<Ledger>>,
    pub peers: PeerClient,
    /// Whether mining pays the node a reward transaction
    pub mining_reward: bool,
}

impl NodeState {
    pub fn new(ledger: Ledger, peers: PeerClient, mining_reward: bool) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            peers,
            mining_reward,
        }
    }

    async fn peer_urls(&self) -> Vec<String> {
        self.ledger.lock().await.peers().urls().to_vec()
    }
}

/// Transaction echoed back with the block it is queued for
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub next_block_index: u64,
}

/// Returns the full ledger snapshot
pub async fn get_blockchain(State(state): State<Arc<NodeState>>) -> Json<Ledger> {
    info!("GET /blockchain");
    let ledger = state.ledger.lock().await;
    Json(ledger.clone())
}

/// Mines the pending pool into a block and announces it
pub async fn mine(State(state): State<Arc<NodeState>>) -> ApiResult<(StatusCode, Json<Value>)> {
    info!("GET /blockchain/block/mine");

    // The lock travels into the blocking task so the pool cannot change
    // between hashing and block creation.
    let guard = Arc::clone(&state.ledger).lock_owned().await;
    let (block, peers, address) = tokio::task::spawn_blocking(move || {
        let mut ledger = guard;
        let block = mine_block(&mut ledger);
        let peers = ledger.peers().urls().to_vec();
        let address = ledger.identity().address.clone();
        (block, peers, address)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("mining task failed: {e}")))?;

    let mut report = state.peers.broadcast_block(&peers, &block).await;

    let reward = if state.mining_reward {
        let tx = reward_transaction(&address);
        debug!("Paying mining reward {} to {}", tx.transaction_id, address);
        state.ledger.lock().await.add_transaction(tx.clone());
        let reward_report = state.peers.broadcast_transaction(&peers, &tx).await;
        merge_reports(&mut report, reward_report);
        Some(tx)
    } else {
        None
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "note": "New block mined and broadcast successfully",
            "block": block,
            "reward": reward,
            "failedPeers": report.failed_peers,
        })),
    ))
}

/// Returns a block by its hash
pub async fn get_block(
    State(state): State<Arc<NodeState>>,
    Path(block_hash): Path<String>,
) -> ApiResult<Json<Block>> {
    info!("GET /blockchain/block/{}", block_hash);
    let ledger = state.ledger.lock().await;
    ledger
        .get_block(&block_hash)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Block {block_hash}")))
}

/// Appends a block pushed by a peer if it extends our tip
pub async fn receive_new_block(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<NewBlockMessage>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    info!("POST /blockchain/receive-new-block");
    let Json(message) = payload?;
    let block = message.new_block.ok_or(ApiError::MissingField("newBlock"))?;
    debug!("Received block {} with hash {}", block.index, block.hash);

    let mut ledger = state.ledger.lock().await;
    match ledger.accept_block(block.clone()) {
        Ok(()) => {
            info!("Accepted block #{} from peer", block.index);
            Ok(Json(json!({
                "note": "New block received and accepted.",
                "newBlock": block,
            })))
        }
        Err(reason) => Err(ApiError::BlockRejected {
            block: Box::new(block),
            reason,
        }),
    }
}

/// Runs a longest-valid-chain round against every registered peer
pub async fn consensus(State(state): State<Arc<NodeState>>) -> Json<Value> {
    info!("GET /blockchain/consensus");
    let peers = state.peer_urls().await;
    let peer_chains = state.peers.fetch_chains(&peers).await;

    let mut ledger = state.ledger.lock().await;
    let outcome = resolve(&mut ledger, peer_chains);
    let message = match outcome {
        ConsensusOutcome::Replaced { .. } => {
            "The chain has been updated with the longest valid blockchain from the network"
        }
        ConsensusOutcome::NoLongerChain | ConsensusOutcome::InvalidCandidate { .. } => {
            "Current chain has not been replaced"
        }
    };

    Json(json!({
        "message": message,
        "replaced": outcome.replaced(),
        "chain": ledger.chain(),
    }))
}

/// Queues a transaction relayed by a peer
pub async fn add_transaction(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<RelayedTransaction>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<QueuedTransaction>)> {
    info!("POST /blockchain/transaction");
    let Json(relayed) = payload?;
    let transaction_id = relayed
        .transaction_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingField("transactionId"))?;

    let tx = Transaction::with_id(transaction_id, relayed.amount, relayed.sender, relayed.recipient);
    let next_block_index = state.ledger.lock().await.add_transaction(tx.clone());
    debug!("Transaction {} queued for block {}", tx.transaction_id, next_block_index);

    Ok((
        StatusCode::CREATED,
        Json(QueuedTransaction {
            transaction: tx,
            next_block_index,
        }),
    ))
}

/// Creates a transaction, queues it and relays it to every peer
pub async fn broadcast_transaction(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<BroadcastTransactionMessage>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    info!("POST /blockchain/transaction/broadcast");
    let Json(request) = payload?;

    let (tx, next_block_index, peers) = {
        let mut ledger = state.ledger.lock().await;
        let tx = if request.is_reward_transaction {
            reward_transaction(&ledger.identity().address)
        } else {
            Transaction::new(
                request.amount.ok_or(ApiError::MissingField("amount"))?,
                request.sender.ok_or(ApiError::MissingField("sender"))?,
                request.recipient.ok_or(ApiError::MissingField("recipient"))?,
            )
        };
        let next_block_index = ledger.add_transaction(tx.clone());
        (tx, next_block_index, ledger.peers().urls().to_vec())
    };
    debug!("Created transaction {}", tx.transaction_id);

    let report = state.peers.broadcast_transaction(&peers, &tx).await;
    if !report.all_delivered() {
        warn!(
            "Transaction {} reached {} of {} peer(s)",
            tx.transaction_id,
            report.delivered,
            peers.len()
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaction created and broadcast to the network.",
            "newTransaction": tx,
            "nextBlockIndex": next_block_index,
            "failedPeers": report.failed_peers,
        })),
    ))
}

/// Returns a mined transaction together with its block
pub async fn get_transaction(
    State(state): State<Arc<NodeState>>,
    Path(transaction_id): Path<String>,
) -> ApiResult<Json<Value>> {
    info!("GET /blockchain/transaction/{}", transaction_id);
    let ledger = state.ledger.lock().await;
    let (tx, block) = ledger
        .get_transaction(&transaction_id)
        .ok_or_else(|| ApiError::NotFound(format!("Transaction {transaction_id}")))?;

    Ok(Json(json!({ "transaction": tx, "block": block })))
}

/// Returns the mined transactions and balance of an address
pub async fn get_address(
    State(state): State<Arc<NodeState>>,
    Path(address): Path<String>,
) -> Json<AddressData> {
    info!("GET /blockchain/address/{}", address);
    Json(state.ledger.lock().await.address_data(&address))
}

/// Registers a node here and introduces it to the rest of the network
pub async fn register_and_broadcast_node(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<RegisterNodeMessage>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    info!("POST /blockchain/register-and-broadcast-node");
    let Json(message) = payload?;
    let new_node_url = message
        .new_node_url
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingField("newNodeUrl"))?;

    let (peers, self_url) = {
        let mut ledger = state.ledger.lock().await;
        if ledger.register_peer(&new_node_url) {
            info!("Registered node {}", new_node_url);
        }
        (ledger.peers().urls().to_vec(), ledger.identity().url.clone())
    };

    let others: Vec<String> = peers.iter().filter(|url| **url != new_node_url).cloned().collect();
    let mut report = state.peers.broadcast_registration(&others, &new_node_url).await;

    let mut network = others;
    network.push(self_url);
    let introduction = match state.peers.register_bulk(&new_node_url, network).await {
        Ok(()) => state.peers.request_consensus(&new_node_url).await,
        Err(e) => Err(e),
    };
    match introduction {
        Ok(()) => report.delivered += 1,
        Err(e) => {
            warn!("Could not introduce the network to {}: {}", new_node_url, e);
            report.failed_peers.push(new_node_url.clone());
        }
    }

    Ok(Json(json!({
        "message": "New node added into the network",
        "newNodeUrl": new_node_url,
        "failedPeers": report.failed_peers,
    })))
}

/// Registers a single node
pub async fn register_node(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<RegisterNodeMessage>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    info!("POST /blockchain/register-node");
    let Json(message) = payload?;
    let new_node_url = message
        .new_node_url
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingField("newNodeUrl"))?;

    let registered = state.ledger.lock().await.register_peer(&new_node_url);
    let note = if registered {
        info!("Registered node {}", new_node_url);
        "New node successfully registered into the network"
    } else {
        debug!("Node {} already known", new_node_url);
        "Node already registered in the network."
    };

    Ok(Json(json!({
        "message": note,
        "newNodeUrl": new_node_url,
        "registered": registered,
    })))
}

/// Registers many nodes at once
pub async fn register_bulk_nodes(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<RegisterBulkMessage>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    info!("POST /blockchain/register-bulk-nodes");
    let Json(message) = payload?;
    let node_urls = message
        .node_urls
        .filter(|urls| !urls.is_empty())
        .ok_or(ApiError::MissingField("nodeUrls"))?;

    let outcome = state.ledger.lock().await.register_peers(&node_urls);
    debug!("Registered {:?}, skipped {:?}", outcome.registered_nodes, outcome.rejected_nodes);

    Ok(Json(json!({
        "message": "Nodes have been successfully registered in the network",
        "registeredNodes": outcome.registered_nodes,
        "rejectedNodes": outcome.rejected_nodes,
    })))
}

fn merge_reports(into: &mut BroadcastReport, other: BroadcastReport) {
    into.delivered += other.delivered;
    for peer in other.failed_peers {
        if !into.failed_peers.contains(&peer) {
            into.failed_peers.push(peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_reports_dedupes_failures() {
        let mut a = BroadcastReport {
            delivered: 1,
            failed_peers: vec!["http://x".into()],
        };
        let b = BroadcastReport {
            delivered: 2,
            failed_peers: vec!["http://x".into(), "http://y".into()],
        };

        merge_reports(&mut a, b);
        assert_eq!(a.delivered, 3);
        assert_eq!(a.failed_peers, ["http://x", "http://y"]);
    }
}
