use super::types::NodeId;

/// Static list of sibling managers a node broadcasts lookups to.
///
/// Insertion order is preserved so that queries fan out in the order peers were
/// configured. The local node and repeated entries are dropped on install.
#[derive(Debug, Clone, Default)]
pub struct PeerDirectory {
    peers: Vec<NodeId>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self { peers: Vec::new() }
    }

    /// Replaces the directory contents. Returns the number of peers kept.
    pub fn install(&mut self, local: &NodeId, peers: Vec<NodeId>) -> usize {
        self.peers.clear();

        for peer in peers {
            if &peer == local {
                tracing::warn!("Ignoring self ({}) in peer list", local);
                continue;
            }
            if self.peers.contains(&peer) {
                tracing::debug!("Ignoring duplicate peer {}", peer);
                continue;
            }
            self.peers.push(peer);
        }

        self.peers.len()
    }

    pub fn peers(&self) -> &[NodeId] {
        &self.peers
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.peers.contains(id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
