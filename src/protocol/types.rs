use crate::catalog::types::Resource;
use crate::membership::types::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Correlation token for one in-flight lookup, unique per originating manager.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LookupId(pub u64);

impl fmt::Display for LookupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup-{}", self.0)
    }
}

/// Kind of access a client asks for. Carried through unchanged; the location
/// protocol never interprets it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    ConcurrentRead,
    ExclusiveWrite,
}

/// A client's request for a resource.
///
/// Forwarded verbatim to the owning manager. `requester` is where the final
/// `AccessReply` is sent, no matter how many hops the request took.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessRequest {
    pub request_id: uuid::Uuid,
    pub resource: String,
    pub mode: AccessMode,
    pub requester: NodeId,
}

impl AccessRequest {
    pub fn new(resource: impl Into<String>, mode: AccessMode, requester: NodeId) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4(),
            resource: resource.into(),
            mode,
            requester,
        }
    }
}

/// Why a request could not be granted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// Every peer answered that it does not own the resource.
    ResourceNotFound,
    /// The owner has the resource but it is disabled.
    ResourceDisabled,
    /// The lookup deadline passed before any peer claimed the resource.
    LookupTimedOut,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DenialReason::ResourceNotFound => "resource_not_found",
            DenialReason::ResourceDisabled => "resource_disabled",
            DenialReason::LookupTimedOut => "lookup_timed_out",
        };
        f.write_str(text)
    }
}

/// How an `AccessRequest` reached the manager handling it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Delivery {
    /// Sent by a client; a local miss starts a lookup.
    Direct,
    /// Sent by the originating manager after a peer claimed the resource.
    /// A miss here is denied rather than looked up again.
    Forwarded,
    /// Re-injected by the originating manager after its lookup found no owner.
    Unowned(DenialReason),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccessOutcome {
    Granted { owner: NodeId },
    Denied { reason: DenialReason },
}

/// Final answer for an `AccessRequest`, sent to its requester.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessReply {
    pub request_id: uuid::Uuid,
    pub resource: String,
    pub outcome: AccessOutcome,
}

impl AccessReply {
    pub fn granted(request: &AccessRequest, owner: NodeId) -> Self {
        Self {
            request_id: request.request_id,
            resource: request.resource.clone(),
            outcome: AccessOutcome::Granted { owner },
        }
    }

    pub fn denied(request: &AccessRequest, reason: DenialReason) -> Self {
        Self {
            request_id: request.request_id,
            resource: request.resource.clone(),
            outcome: AccessOutcome::Denied { reason },
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self.outcome, AccessOutcome::Granted { .. })
    }
}

/// Which bootstrap step a `BootstrapAck` acknowledges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BootstrapStep {
    LocalResources,
    LocalClients,
    Peers,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Message {
    SetLocalResources(Vec<Resource>),
    SetLocalClients(Vec<NodeId>),
    SetPeers(Vec<NodeId>),
    BootstrapAck(BootstrapStep),

    LookupQuery {
        lookup: LookupId,
        resource: String,
    },

    LookupResponse {
        lookup: LookupId,
        resource: String,
        found: bool,
        responder: NodeId,
    },

    AccessRequest {
        request: AccessRequest,
        delivery: Delivery,
    },

    AccessReply(AccessReply),
}

impl Message {
    /// Short label used in logs and unhandled-message diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::SetLocalResources(_) => "set_local_resources",
            Message::SetLocalClients(_) => "set_local_clients",
            Message::SetPeers(_) => "set_peers",
            Message::BootstrapAck(_) => "bootstrap_ack",
            Message::LookupQuery { .. } => "lookup_query",
            Message::LookupResponse { .. } => "lookup_response",
            Message::AccessRequest { .. } => "access_request",
            Message::AccessReply(_) => "access_reply",
        }
    }
}

/// A message together with its sender and recipient.
///
/// `to` lets a shared UDP socket dispatch an incoming datagram to the right local
/// endpoint; `from` plays the role of the reply address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    pub from: NodeId,
    pub to: NodeId,
    pub body: Message,
}

impl Envelope {
    pub fn new(from: NodeId, to: NodeId, body: Message) -> Self {
        Self { from, to, body }
    }
}
