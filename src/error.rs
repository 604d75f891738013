//! Error Types
//!
//! Typed failures raised by the transport, codec and configuration layers.
//! Protocol-level conditions (stray responses, exhausted quorums, deadlines)
//! are not errors: they are resolved inside the manager and surface only as
//! denials to the requester.

use crate::membership::types::NodeId;

#[derive(thiserror::Error, Debug)]
pub enum ClusterError {
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no route to endpoint {0:?}")]
    UnknownEndpoint(NodeId),

    #[error("mailbox of {0:?} is closed")]
    MailboxClosed(NodeId),

    #[error("udp writer has stopped")]
    WriterStopped,

    #[error("datagram of {0} bytes exceeds the {1} byte limit")]
    Oversized(usize, usize),

    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unhandled message '{kind}' from {from:?}")]
    Unhandled { kind: &'static str, from: NodeId },
}

pub type ClusterResult<T> = std::result::Result<T, ClusterError>;
