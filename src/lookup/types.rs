use crate::membership::types::NodeId;
use crate::protocol::types::{AccessRequest, LookupId};
use std::collections::BTreeSet;
use std::time::Instant;

/// State kept for one lookup while it waits for peer answers.
#[derive(Debug, Clone)]
pub struct PendingLookup {
    pub id: LookupId,
    /// The request to forward or deny once the lookup resolves. Its `requester` is the
    /// original requester.
    pub request: AccessRequest,
    /// Peers that were queried and have not answered yet.
    pub awaiting: BTreeSet<NodeId>,
    pub started_at: Instant,
}

impl PendingLookup {
    pub fn resource(&self) -> &str {
        &self.request.resource
    }

    /// The remaining-peer counter.
    pub fn remaining(&self) -> usize {
        self.awaiting.len()
    }
}

/// Result of starting a lookup.
#[derive(Debug)]
pub enum LookupStart {
    /// Query these peers with the given token.
    Querying { id: LookupId, peers: Vec<NodeId> },
    /// There is nobody to ask; the request has no owner.
    Exhausted { request: AccessRequest },
}

/// Result of folding one peer answer into the tracker.
#[derive(Debug, PartialEq)]
pub enum ResponseOutcome {
    /// A peer claimed the resource. Forward the request to `owner`.
    Forward { owner: NodeId, request: AccessRequest },
    /// Every queried peer answered negatively.
    Exhausted { request: AccessRequest },
    /// Negative answer counted; `remaining` peers are still awaited.
    Waiting { remaining: usize },
    /// No matching pending lookup or the responder was not awaited. Nothing changed.
    Stray,
}
