//! Diagnostic Log Sink
//!
//! Managers report protocol milestones as one-way `LogRecord`s. Sending never blocks and
//! never fails from the caller's point of view: a sink that has gone away simply stops
//! receiving records.

pub mod sink;
pub mod types;
