//! Resource Manager Module
//!
//! A resource manager is a single tokio task that owns its catalog, client roster, peer
//! directory and lookup tracker. It consumes one event at a time from its mailbox (and from
//! its private deadline channel), which makes every protocol step atomic without locks.
//!
//! ## Request Handling
//! - **Owned resource**: decided locally and answered to the requester.
//! - **Unknown resource, direct request**: a lookup is broadcast to every peer. The first
//!   peer claiming the resource receives the original request verbatim; if every peer
//!   declines (or the deadline passes) the request is re-injected as unowned and denied.
//! - **Unknown resource, forwarded request**: denied, never re-broadcast.
//!
//! ## Submodules
//! - **`node`**: The manager state and its event loop.
//! - **`bootstrap`**: One-time installation of resources, clients and peers over messages.
//! - **`client`**: Requester-side helper that submits a request and awaits its reply.

pub mod bootstrap;
pub mod client;
pub mod node;
