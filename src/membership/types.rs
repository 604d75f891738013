use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;

/// Identity of a manager node or a client endpoint.
///
/// Used as a map key, as the "who answered" value of a lookup response, and as the
/// forwarding target once an owner is known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Builds an identity that embeds the socket address it can be reached at.
    pub fn at(name: &str, addr: SocketAddr) -> Self {
        Self(format!("{}@{}", name, addr))
    }

    /// Socket address embedded in an `name@host:port` identity, if any.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        let (_, addr) = self.0.rsplit_once('@')?;
        addr.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A sibling manager together with the UDP address it listens on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeerAddress {
    pub id: NodeId,
    pub addr: SocketAddr,
}
