//! HTTP server
//!
//! Axum router wiring every ledger route to its handler.

use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::p2p::{
    ADDRESS_PATH, BLOCK_PATH, BROADCAST_TRANSACTION_PATH, CHAIN_PATH, CONSENSUS_PATH, MINE_PATH,
    RECEIVE_BLOCK_PATH, REGISTER_AND_BROADCAST_PATH, REGISTER_BULK_PATH, REGISTER_NODE_PATH,
    TRANSACTION_LOOKUP_PATH, TRANSACTION_PATH,
};
use crate::rpc::methods::*;

/// Build the application router
pub fn router(state: Arc<NodeState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The literal mine route is registered alongside the block lookup;
    // axum prefers static segments over captures.
    Router::new()
        .route(CHAIN_PATH, get(get_blockchain))
        .route(MINE_PATH, get(mine))
        .route(BLOCK_PATH, get(get_block))
        .route(RECEIVE_BLOCK_PATH, post(receive_new_block))
        .route(CONSENSUS_PATH, get(consensus))
        .route(TRANSACTION_PATH, post(add_transaction))
        .route(BROADCAST_TRANSACTION_PATH, post(broadcast_transaction))
        .route(TRANSACTION_LOOKUP_PATH, get(get_transaction))
        .route(ADDRESS_PATH, get(get_address))
        .route(REGISTER_AND_BROADCAST_PATH, post(register_and_broadcast_node))
        .route(REGISTER_NODE_PATH, post(register_node))
        .route(REGISTER_BULK_PATH, post(register_bulk_nodes))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `addr` until the process is stopped
pub async fn start_rpc_server(state: Arc<NodeState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Ledger node listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received. Stopping node...");
    }
}
