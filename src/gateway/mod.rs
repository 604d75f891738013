//! HTTP Gateway Module
//!
//! Lets HTTP clients talk to the local resource manager. Each request is submitted through
//! an `AccessClient` on a fresh endpoint, so concurrent HTTP calls never share a mailbox.
//!
//! ## Submodules
//! - **`types`**: JSON request/response bodies and endpoint paths.
//! - **`handlers`**: Axum handlers and the router builder.

pub mod handlers;
pub mod types;
