//! Lookup Tracker Tests
//!
//! Exercises the per-node lookup state machine without any messaging.
//!
//! ## Test Scopes
//! - **Quorum-negative**: N negative answers deny; fewer keep waiting; N = 0 denies at once.
//! - **First-positive-wins**: The first claim forwards regardless of arrival order.
//! - **Strays**: Late, duplicate, foreign and mismatched answers change nothing.
//! - **Multiplexing**: Concurrent lookups for the same resource never overwrite each other.
//! - **Expiry**: Deadlines resolve a lookup once and only once.

#[cfg(test)]
mod tests {
    use crate::lookup::tracker::PendingLookupTracker;
    use crate::lookup::types::{LookupStart, ResponseOutcome};
    use crate::membership::directory::PeerDirectory;
    use crate::membership::types::NodeId;
    use crate::protocol::types::{AccessMode, AccessRequest, LookupId};

    fn node(name: &str) -> NodeId {
        NodeId::named(name)
    }

    fn directory(peers: &[&str]) -> PeerDirectory {
        let mut directory = PeerDirectory::new();
        directory.install(&node("rm-a"), peers.iter().map(|p| node(p)).collect());
        directory
    }

    fn request(resource: &str) -> AccessRequest {
        AccessRequest::new(resource, AccessMode::ConcurrentRead, node("alice"))
    }

    fn begin(tracker: &mut PendingLookupTracker, req: AccessRequest, dir: &PeerDirectory) -> LookupId {
        match tracker.begin(req, dir) {
            LookupStart::Querying { id, .. } => id,
            LookupStart::Exhausted { .. } => panic!("Expected a querying lookup"),
        }
    }

    // ============================================================
    // BEGIN
    // ============================================================

    #[test]
    fn test_begin_queries_every_peer_in_order() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b", "rm-c", "rm-d"]);

        match tracker.begin(request("printer1"), &dir) {
            LookupStart::Querying { id, peers } => {
                assert_eq!(peers, vec![node("rm-b"), node("rm-c"), node("rm-d")]);
                assert_eq!(tracker.get(id).unwrap().remaining(), 3);
            }
            LookupStart::Exhausted { .. } => panic!("Expected querying"),
        }

        assert!(tracker.contains_resource("printer1"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_begin_with_no_peers_is_exhausted_immediately() {
        let mut tracker = PendingLookupTracker::new();
        let req = request("mystery");

        match tracker.begin(req.clone(), &PeerDirectory::new()) {
            LookupStart::Exhausted { request } => assert_eq!(request, req),
            LookupStart::Querying { .. } => panic!("Nobody to query"),
        }

        assert!(tracker.is_empty());
        assert!(!tracker.contains_resource("mystery"));
    }

    // ============================================================
    // QUORUM-NEGATIVE RESOLUTION
    // ============================================================

    #[test]
    fn test_denied_after_exactly_n_negative_answers() {
        for n in 1..=5usize {
            // ARRANGE
            let mut tracker = PendingLookupTracker::new();
            let names: Vec<String> = (0..n).map(|i| format!("rm-{}", i)).collect();
            let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
            let dir = directory(&refs);
            let req = request("scanner9");
            let id = begin(&mut tracker, req.clone(), &dir);

            // ACT + ASSERT: the first n-1 negatives keep waiting
            for (i, peer) in names.iter().enumerate().take(n - 1) {
                let outcome = tracker.on_response(id, "scanner9", false, &node(peer));
                assert_eq!(outcome, ResponseOutcome::Waiting { remaining: n - i - 1 });
            }

            // the n-th negative exhausts the quorum
            let outcome = tracker.on_response(id, "scanner9", false, &node(&names[n - 1]));
            assert_eq!(outcome, ResponseOutcome::Exhausted { request: req });
            assert!(tracker.is_empty());
            assert!(!tracker.contains_resource("scanner9"));
        }
    }

    #[test]
    fn test_duplicate_negative_from_same_peer_does_not_exhaust() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b", "rm-c"]);
        let id = begin(&mut tracker, request("scanner9"), &dir);

        assert_eq!(
            tracker.on_response(id, "scanner9", false, &node("rm-b")),
            ResponseOutcome::Waiting { remaining: 1 }
        );
        assert_eq!(
            tracker.on_response(id, "scanner9", false, &node("rm-b")),
            ResponseOutcome::Stray
        );
        assert!(tracker.contains_resource("scanner9"));
    }

    // ============================================================
    // FIRST-POSITIVE-WINS
    // ============================================================

    #[test]
    fn test_first_positive_forwards_regardless_of_order() {
        let peers = ["rm-b", "rm-c", "rm-d"];

        // owner answers first, second or last
        for owner_position in 0..peers.len() {
            let mut tracker = PendingLookupTracker::new();
            let dir = directory(&peers);
            let req = request("printer1");
            let id = begin(&mut tracker, req.clone(), &dir);

            let mut forwarded = None;
            for (i, peer) in peers.iter().enumerate() {
                let found = i == owner_position;
                let outcome = tracker.on_response(id, "printer1", found, &node(peer));
                match outcome {
                    ResponseOutcome::Forward { owner, request } => {
                        assert!(forwarded.is_none(), "Forwarded twice");
                        assert_eq!(request, req);
                        forwarded = Some(owner);
                    }
                    ResponseOutcome::Waiting { .. } => assert!(forwarded.is_none()),
                    ResponseOutcome::Stray => assert!(forwarded.is_some()),
                    ResponseOutcome::Exhausted { .. } => panic!("Owner exists"),
                }
            }

            assert_eq!(forwarded, Some(node(peers[owner_position])));
            assert!(!tracker.contains_resource("printer1"));
        }
    }

    #[test]
    fn test_second_positive_is_stray() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b", "rm-c"]);
        let id = begin(&mut tracker, request("printer1"), &dir);

        assert!(matches!(
            tracker.on_response(id, "printer1", true, &node("rm-c")),
            ResponseOutcome::Forward { .. }
        ));
        assert_eq!(
            tracker.on_response(id, "printer1", true, &node("rm-b")),
            ResponseOutcome::Stray
        );
    }

    // ============================================================
    // STRAY HANDLING
    // ============================================================

    #[test]
    fn test_response_for_unknown_lookup_is_stray() {
        let mut tracker = PendingLookupTracker::new();

        let outcome = tracker.on_response(LookupId(99), "printer1", false, &node("rm-b"));

        assert_eq!(outcome, ResponseOutcome::Stray);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_extra_response_after_resolution_changes_nothing() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b"]);
        let id = begin(&mut tracker, request("scanner9"), &dir);
        tracker.on_response(id, "scanner9", false, &node("rm-b"));

        for found in [false, true] {
            assert_eq!(
                tracker.on_response(id, "scanner9", found, &node("rm-b")),
                ResponseOutcome::Stray
            );
        }
        assert!(tracker.is_empty());
        assert!(!tracker.contains_resource("scanner9"));
    }

    #[test]
    fn test_response_from_unqueried_node_is_stray() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b"]);
        let id = begin(&mut tracker, request("printer1"), &dir);

        assert_eq!(
            tracker.on_response(id, "printer1", true, &node("rm-zz")),
            ResponseOutcome::Stray
        );
        assert_eq!(tracker.get(id).unwrap().remaining(), 1);
    }

    #[test]
    fn test_response_with_mismatched_resource_is_stray() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b"]);
        let id = begin(&mut tracker, request("printer1"), &dir);

        assert_eq!(
            tracker.on_response(id, "scanner9", false, &node("rm-b")),
            ResponseOutcome::Stray
        );
        assert!(tracker.contains_resource("printer1"));
    }

    // ============================================================
    // MULTIPLEXING
    // ============================================================

    #[test]
    fn test_concurrent_lookups_for_same_resource_do_not_overwrite() {
        // ARRANGE
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b", "rm-c"]);
        let first = request("printer1");
        let second = request("printer1");

        // ACT
        let id1 = begin(&mut tracker, first.clone(), &dir);
        let id2 = begin(&mut tracker, second.clone(), &dir);

        // ASSERT
        assert_ne!(id1, id2);
        assert_eq!(tracker.active_for("printer1"), vec![id1, id2]);

        let out1 = tracker.on_response(id1, "printer1", true, &node("rm-c"));
        assert_eq!(
            out1,
            ResponseOutcome::Forward {
                owner: node("rm-c"),
                request: first
            }
        );
        assert_eq!(tracker.active_for("printer1"), vec![id2]);

        let out2 = tracker.on_response(id2, "printer1", true, &node("rm-c"));
        assert_eq!(
            out2,
            ResponseOutcome::Forward {
                owner: node("rm-c"),
                request: second
            }
        );
        assert!(!tracker.contains_resource("printer1"));
    }

    // ============================================================
    // EXPIRY
    // ============================================================

    #[test]
    fn test_expire_removes_once() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b"]);
        let req = request("printer1");
        let id = begin(&mut tracker, req.clone(), &dir);

        let expired = tracker.expire(id).expect("Lookup should still be pending");
        assert_eq!(expired.request, req);
        assert!(!tracker.contains_resource("printer1"));

        assert!(tracker.expire(id).is_none());
        assert_eq!(
            tracker.on_response(id, "printer1", true, &node("rm-b")),
            ResponseOutcome::Stray
        );
    }

    #[test]
    fn test_expire_after_resolution_is_none() {
        let mut tracker = PendingLookupTracker::new();
        let dir = directory(&["rm-b"]);
        let id = begin(&mut tracker, request("printer1"), &dir);

        tracker.on_response(id, "printer1", true, &node("rm-b"));

        assert!(tracker.expire(id).is_none());
    }
}
