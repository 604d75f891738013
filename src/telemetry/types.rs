use crate::membership::types::NodeId;
use crate::protocol::types::{DenialReason, LookupId};
use serde::Serialize;

/// A diagnostic event emitted by a manager.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogRecord {
    LookupStarted {
        node: NodeId,
        resource: String,
        lookup: LookupId,
        peers: usize,
    },
    Forwarded {
        node: NodeId,
        resource: String,
        owner: NodeId,
    },
    Granted {
        node: NodeId,
        resource: String,
        requester: NodeId,
        local_client: bool,
    },
    Denied {
        node: NodeId,
        resource: String,
        requester: NodeId,
        reason: DenialReason,
    },
    StrayResponse {
        node: NodeId,
        resource: String,
        responder: NodeId,
    },
    Unhandled {
        node: NodeId,
        kind: String,
        from: NodeId,
    },
}
