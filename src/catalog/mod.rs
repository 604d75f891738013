//! Local Catalog Module
//!
//! Per-node bookkeeping installed once at bootstrap: the resources this manager owns
//! and the clients attached to it.
//!
//! ## Core Concepts
//! - **LocalCatalog**: Name -> `Resource` table. Every resource is enabled on install; the
//!   set of names never changes afterwards, only the enabled flag may.
//! - **ClientRoster**: The node's local clients. Not consulted for routing, only to tell
//!   local requesters apart from remote ones.

pub mod catalog;
pub mod roster;
pub mod types;
