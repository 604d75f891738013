//! Membership & Peer Directory Module
//!
//! Identifies coordinator nodes and their clients, and records the static set of
//! sibling managers each node fans lookups out to.
//!
//! ## Core Concepts
//! - **NodeId**: Opaque, comparable identity shared by managers and clients. An identity
//!   carrying an `@host:port` suffix can be routed over UDP without an address book entry.
//! - **PeerDirectory**: Ordered, duplicate-free list of sibling managers, excluding the
//!   local node. Installed once at bootstrap and read-only afterwards.

pub mod directory;
pub mod types;
