//! Ledger node
//!
//! Main entry point for running a ledger node.

use clap::Parser;
use log::{info, LevelFilter};
use pow_ledger::config::NodeConfig;
use pow_ledger::p2p::PeerClient;
use pow_ledger::rpc::{start_rpc_server, NodeState};
use pow_ledger::storage::Ledger;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = NodeConfig::parse();
    let identity = config.identity();
    info!("Node address: {}", identity.address);
    info!("Node URL:     {}", identity.url);

    let ledger = Ledger::with_identity(identity);
    let peers = PeerClient::new(config.peer_timeout())?;
    let state = Arc::new(NodeState::new(ledger, peers, config.mining_reward()));

    start_rpc_server(state, config.listen_addr()).await?;
    Ok(())
}
