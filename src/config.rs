//! Node configuration
//!
//! Command-line flags with environment-variable fallbacks.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::node::NodeIdentity;

#[derive(Debug, Clone, Parser)]
#[command(name = "ledger-node", about = "Replicated proof-of-work ledger node")]
pub struct NodeConfig {
    /// Port the HTTP API listens on
    #[arg(long, env = "LEDGER_PORT", default_value_t = 3001)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "LEDGER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Public URL peers use to reach this node (default: http://localhost:<port>)
    #[arg(long, env = "LEDGER_NODE_URL")]
    pub node_url: Option<String>,

    /// Ledger address credited with mining rewards (default: freshly generated)
    #[arg(long, env = "LEDGER_NODE_ADDRESS")]
    pub node_address: Option<String>,

    /// Do not pay a reward transaction after mining
    #[arg(long)]
    pub no_mining_reward: bool,

    /// Timeout for calls to peers, in seconds
    #[arg(long, env = "LEDGER_PEER_TIMEOUT_SECS", default_value_t = 10)]
    pub peer_timeout_secs: u64,
}

impl NodeConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn node_url(&self) -> String {
        self.node_url
            .clone()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn identity(&self) -> NodeIdentity {
        match &self.node_address {
            Some(address) => NodeIdentity::new(address.clone(), self.node_url()),
            None => NodeIdentity::generate(self.node_url()),
        }
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }

    pub fn mining_reward(&self) -> bool {
        !self.no_mining_reward
    }
}
