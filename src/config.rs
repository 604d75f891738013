//! Node Configuration
//!
//! A node is described by a TOML file: its identity, the UDP address managers talk on,
//! an optional HTTP gateway address, lookup tunables, and the bootstrap data (resources,
//! local clients, sibling managers with their addresses).
//!
//! ```toml
//! id = "rm-a"
//! bind = "127.0.0.1:7000"
//! http = "127.0.0.1:8000"
//! lookup_timeout_ms = 2000
//! clients = ["alice"]
//!
//! [[resources]]
//! name = "printer1"
//!
//! [[peers]]
//! id = "rm-b"
//! addr = "127.0.0.1:7001"
//! ```

use crate::catalog::types::Resource;
use crate::error::{ClusterError, ClusterResult};
use crate::manager::bootstrap::BootstrapPlan;
use crate::manager::node::ManagerSettings;
use crate::membership::types::{NodeId, PeerAddress};

use serde::Deserialize;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_REPLY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub id: String,
    pub bind: SocketAddr,
    #[serde(default)]
    pub http: Option<SocketAddr>,
    /// `0` disables the lookup deadline.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    #[serde(default = "default_reply_timeout_ms")]
    pub reply_timeout_ms: u64,
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
    #[serde(default)]
    pub clients: Vec<String>,
    #[serde(default)]
    pub peers: Vec<PeerAddress>,
}

fn default_lookup_timeout_ms() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_MS
}

fn default_reply_timeout_ms() -> u64 {
    DEFAULT_REPLY_TIMEOUT_MS
}

impl NodeConfig {
    pub fn from_toml(text: &str) -> ClusterResult<Self> {
        let config: NodeConfig =
            toml::from_str(text).map_err(|e| ClusterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ClusterResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClusterError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> ClusterResult<()> {
        if self.id.trim().is_empty() {
            return Err(ClusterError::Config("node id must not be empty".into()));
        }

        let mut names = HashSet::new();
        for resource in &self.resources {
            if !names.insert(resource.name.as_str()) {
                return Err(ClusterError::Config(format!(
                    "resource '{}' listed twice",
                    resource.name
                )));
            }
        }

        let mut peers = HashSet::new();
        for peer in &self.peers {
            if peer.id.as_str() == self.id {
                return Err(ClusterError::Config(format!(
                    "node '{}' lists itself as a peer",
                    self.id
                )));
            }
            if !peers.insert(&peer.id) {
                return Err(ClusterError::Config(format!(
                    "peer '{}' listed twice",
                    peer.id
                )));
            }
        }

        Ok(())
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::named(self.id.clone())
    }

    pub fn settings(&self) -> ManagerSettings {
        ManagerSettings {
            lookup_timeout: match self.lookup_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    pub fn bootstrap_plan(&self) -> BootstrapPlan {
        BootstrapPlan {
            resources: self
                .resources
                .iter()
                .map(|r| Resource::new(r.name.clone()))
                .collect(),
            clients: self.clients.iter().map(|c| NodeId::named(c.clone())).collect(),
            peers: self.peers.iter().map(|p| p.id.clone()).collect(),
        }
    }
}
