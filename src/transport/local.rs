use super::{Mailbox, Transport};
use crate::error::{ClusterError, ClusterResult};
use crate::membership::types::NodeId;
use crate::protocol::types::Envelope;

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Routes envelopes between endpoints living in the same process.
#[derive(Default)]
pub struct LocalTransport {
    endpoints: DashMap<NodeId, mpsc::UnboundedSender<Envelope>>,
}

impl LocalTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

impl Transport for LocalTransport {
    fn send(&self, envelope: Envelope) -> ClusterResult<()> {
        let to = envelope.to.clone();
        let tx = self
            .endpoints
            .get(&to)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ClusterError::UnknownEndpoint(to.clone()))?;

        tx.send(envelope).map_err(|_| ClusterError::MailboxClosed(to))
    }

    fn register(&self, id: NodeId) -> Mailbox {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.endpoints.insert(id.clone(), tx).is_some() {
            tracing::debug!("Replaced mailbox for {}", id);
        }
        rx
    }

    fn unregister(&self, id: &NodeId) {
        self.endpoints.remove(id);
    }
}
