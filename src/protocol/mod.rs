//! Manager Wire Protocol
//!
//! Every interaction between managers and clients is a `Message` carried in an
//! `Envelope`. The message set is a closed enum, so each manager matches it
//! exhaustively and anything it does not consume falls into an explicit "unhandled" arm.
//!
//! ## Message Families
//! - **Bootstrap**: `SetLocalResources`, `SetLocalClients`, `SetPeers`, answered with `BootstrapAck`.
//! - **Location**: `LookupQuery` / `LookupResponse`, correlated by a per-request `LookupId`.
//! - **Access**: `AccessRequest` (forwarded verbatim to the owner) and the final `AccessReply`.

pub mod codec;
pub mod types;
