//! Message Transport Module
//!
//! Moves `Envelope`s between endpoints (managers and clients) without ever blocking
//! the sender.
//!
//! ## Implementations
//! - **`local`**: In-process registry of mailboxes. Used for embedded clusters and tests.
//! - **`udp`**: Bincode datagrams over a single UDP socket shared by all endpoints of a
//!   process, with an address book for sibling managers.

pub mod local;
pub mod udp;

#[cfg(test)]
mod tests;

use crate::error::ClusterResult;
use crate::membership::types::NodeId;
use crate::protocol::types::Envelope;
use tokio::sync::mpsc;

pub type Mailbox = mpsc::UnboundedReceiver<Envelope>;

/// Delivery of envelopes to named endpoints.
pub trait Transport: Send + Sync + 'static {
    /// Queues `envelope` for `envelope.to`. Never blocks; an error means the
    /// envelope was dropped.
    fn send(&self, envelope: Envelope) -> ClusterResult<()>;

    /// Creates a mailbox for a local endpoint, replacing any previous one for `id`.
    fn register(&self, id: NodeId) -> Mailbox;

    fn unregister(&self, id: &NodeId);

    /// Identity under which a local endpoint called `name` can be reached by any
    /// endpoint in the cluster.
    fn endpoint(&self, name: &str) -> NodeId {
        NodeId::named(name)
    }
}
