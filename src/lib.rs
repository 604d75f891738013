//! Resource Cluster Library
//!
//! A set of peer resource managers that cooperate to locate the owner of a named resource
//! and route client access requests to it. The binary (`main.rs`) runs one manager per
//! process over UDP; tests run whole clusters in-process.
//!
//! ## Architecture Modules
//! - **`catalog`**: Resources a manager owns and the clients attached to it.
//! - **`config`**: TOML node configuration and its validation.
//! - **`error`**: Typed errors shared across layers.
//! - **`gateway`**: HTTP front door (`POST /access`) for clients outside the cluster.
//! - **`lookup`**: Bookkeeping for in-flight "who owns X?" broadcasts.
//! - **`manager`**: The resource manager task, its bootstrap, and the requester-side client.
//! - **`membership`**: Node identities and the peer directory.
//! - **`protocol`**: The closed message set exchanged between endpoints and its wire codec.
//! - **`telemetry`**: Structured protocol events, drained into `tracing`.
//! - **`transport`**: Envelope delivery, in-process (`LocalTransport`) or over UDP.

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lookup;
pub mod manager;
pub mod membership;
pub mod protocol;
pub mod telemetry;
pub mod transport;
