use super::types::{LookupStart, PendingLookup, ResponseOutcome};
use crate::membership::directory::PeerDirectory;
use crate::membership::types::NodeId;
use crate::protocol::types::{AccessRequest, LookupId};

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

/// In-flight lookups originated by one manager.
///
/// Only the owning manager's event loop touches the tracker, so each method call is one
/// atomic step relative to every other response.
#[derive(Debug, Default)]
pub struct PendingLookupTracker {
    next_id: u64,
    lookups: HashMap<LookupId, PendingLookup>,
    by_resource: HashMap<String, BTreeSet<LookupId>>,
}

impl PendingLookupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a lookup for `request` that awaits every peer in `directory`.
    pub fn begin(&mut self, request: AccessRequest, directory: &PeerDirectory) -> LookupStart {
        if directory.is_empty() {
            return LookupStart::Exhausted { request };
        }

        self.next_id += 1;
        let id = LookupId(self.next_id);
        let peers = directory.peers().to_vec();

        self.by_resource
            .entry(request.resource.clone())
            .or_default()
            .insert(id);
        self.lookups.insert(
            id,
            PendingLookup {
                id,
                request,
                awaiting: peers.iter().cloned().collect(),
                started_at: Instant::now(),
            },
        );

        LookupStart::Querying { id, peers }
    }

    /// Folds one `LookupResponse` into the matching lookup.
    pub fn on_response(
        &mut self,
        id: LookupId,
        resource: &str,
        found: bool,
        responder: &NodeId,
    ) -> ResponseOutcome {
        let Some(pending) = self.lookups.get_mut(&id) else {
            return ResponseOutcome::Stray;
        };

        if pending.resource() != resource || !pending.awaiting.contains(responder) {
            return ResponseOutcome::Stray;
        }

        if found {
            let pending = self.remove(id);
            return match pending {
                Some(pending) => ResponseOutcome::Forward {
                    owner: responder.clone(),
                    request: pending.request,
                },
                None => ResponseOutcome::Stray,
            };
        }

        pending.awaiting.remove(responder);
        let remaining = pending.remaining();
        if remaining > 0 {
            return ResponseOutcome::Waiting { remaining };
        }

        match self.remove(id) {
            Some(pending) => ResponseOutcome::Exhausted {
                request: pending.request,
            },
            None => ResponseOutcome::Stray,
        }
    }

    /// Resolves a lookup whose deadline passed. `None` if it already resolved.
    pub fn expire(&mut self, id: LookupId) -> Option<PendingLookup> {
        self.remove(id)
    }

    pub fn get(&self, id: LookupId) -> Option<&PendingLookup> {
        self.lookups.get(&id)
    }

    /// Whether any lookup for `resource` is still pending.
    pub fn contains_resource(&self, resource: &str) -> bool {
        self.by_resource.contains_key(resource)
    }

    /// Active lookup tokens for `resource`, oldest first.
    pub fn active_for(&self, resource: &str) -> Vec<LookupId> {
        self.by_resource
            .get(resource)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    fn remove(&mut self, id: LookupId) -> Option<PendingLookup> {
        let pending = self.lookups.remove(&id)?;

        if let Some(ids) = self.by_resource.get_mut(pending.resource()) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_resource.remove(pending.resource());
            }
        }

        Some(pending)
    }
}
