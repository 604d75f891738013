//! Pending Lookup Tracker
//!
//! Bookkeeping for the distributed "who owns resource X?" queries a manager originates.
//!
//! ## Lifecycle
//! 1. **Begin**: A local catalog miss allocates a fresh `LookupId` that awaits every peer.
//!    With no peers the lookup is exhausted on the spot and nothing is retained.
//! 2. **Fold**: Each `LookupResponse` is matched by token. A positive answer resolves the
//!    lookup to its responder (first positive wins); a negative answer strikes the
//!    responder off the awaited set.
//! 3. **Resolve**: The entry is removed exactly once: on the first positive answer, when
//!    the awaited set empties, or when its deadline fires. Anything arriving afterwards
//!    is reported as stray and changes nothing.
//!
//! Several lookups for the same resource can be in flight at once; a secondary index
//! maps resource names to their active tokens.

pub mod tracker;
pub mod types;

#[cfg(test)]
mod tests;
