use crate::membership::types::NodeId;
use std::collections::HashSet;

/// Clients attached to this manager.
#[derive(Debug, Default)]
pub struct ClientRoster {
    clients: HashSet<NodeId>,
}

impl ClientRoster {
    pub fn new() -> Self {
        Self {
            clients: HashSet::new(),
        }
    }

    pub fn install(&mut self, clients: Vec<NodeId>) -> usize {
        self.clients = clients.into_iter().collect();
        self.clients.len()
    }

    pub fn is_local(&self, client: &NodeId) -> bool {
        self.clients.contains(client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
