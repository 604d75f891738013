//! Transport Module Tests
//!
//! ## Test Scopes
//! - **LocalTransport**: Mailbox registration, delivery and failure modes.
//! - **UdpTransport**: Loopback delivery through the address book, through identities
//!   with an embedded address, and resilience to undecodable datagrams.

#[cfg(test)]
mod tests {
    use crate::error::ClusterError;
    use crate::membership::types::{NodeId, PeerAddress};
    use crate::protocol::types::{BootstrapStep, Envelope, LookupId, Message};
    use crate::transport::Transport;
    use crate::transport::local::LocalTransport;
    use crate::transport::udp::UdpTransport;
    use std::time::Duration;

    fn ack(from: &NodeId, to: &NodeId) -> Envelope {
        Envelope::new(from.clone(), to.clone(), Message::BootstrapAck(BootstrapStep::Peers))
    }

    // ============================================================
    // LOCAL TRANSPORT
    // ============================================================

    #[tokio::test]
    async fn test_local_delivery() {
        let transport = LocalTransport::new();
        let a = NodeId::named("rm-a");
        let b = NodeId::named("rm-b");
        let mut mailbox = transport.register(b.clone());

        transport.send(ack(&a, &b)).expect("send failed");

        let envelope = mailbox.recv().await.expect("mailbox closed");
        assert_eq!(envelope.from, a);
        assert_eq!(envelope.body, Message::BootstrapAck(BootstrapStep::Peers));
    }

    #[test]
    fn test_local_unknown_endpoint() {
        let transport = LocalTransport::new();
        let to = NodeId::named("nobody");

        let result = transport.send(ack(&NodeId::named("rm-a"), &to));

        assert!(matches!(result, Err(ClusterError::UnknownEndpoint(id)) if id == to));
    }

    #[test]
    fn test_local_closed_mailbox() {
        let transport = LocalTransport::new();
        let b = NodeId::named("rm-b");
        drop(transport.register(b.clone()));

        let result = transport.send(ack(&NodeId::named("rm-a"), &b));

        assert!(matches!(result, Err(ClusterError::MailboxClosed(_))));
    }

    #[test]
    fn test_local_unregister() {
        let transport = LocalTransport::new();
        let b = NodeId::named("rm-b");
        let _mailbox = transport.register(b.clone());
        assert_eq!(transport.endpoint_count(), 1);

        transport.unregister(&b);

        assert_eq!(transport.endpoint_count(), 0);
        assert!(transport.send(ack(&NodeId::named("rm-a"), &b)).is_err());
    }

    #[test]
    fn test_local_endpoint_is_plain_name() {
        let transport = LocalTransport::new();

        assert_eq!(transport.endpoint("alice"), NodeId::named("alice"));
    }

    // ============================================================
    // UDP TRANSPORT
    // ============================================================

    #[tokio::test]
    async fn test_udp_delivery_via_address_book() {
        // ARRANGE: two processes' worth of transports on loopback
        let t1 = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let t2 = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        t2.start();

        let a = NodeId::named("rm-a");
        let b = NodeId::named("rm-b");
        let mut mailbox_b = t2.register(b.clone());
        t1.add_peer(PeerAddress {
            id: b.clone(),
            addr: t2.local_addr(),
        });

        // ACT
        t1.send(ack(&a, &b)).expect("send failed");

        // ASSERT
        let envelope = tokio::time::timeout(Duration::from_secs(2), mailbox_b.recv())
            .await
            .expect("timed out")
            .expect("mailbox closed");
        assert_eq!(envelope.from, a);
        assert_eq!(envelope.to, b);
    }

    #[tokio::test]
    async fn test_udp_delivery_via_embedded_address() {
        let t1 = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let t2 = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        t2.start();

        let client = t2.endpoint("http-client");
        assert_eq!(client.socket_addr(), Some(t2.local_addr()));
        let mut mailbox = t2.register(client.clone());

        t1.send(ack(&NodeId::named("rm-a"), &client)).unwrap();

        let envelope = tokio::time::timeout(Duration::from_secs(2), mailbox.recv())
            .await
            .expect("timed out")
            .expect("mailbox closed");
        assert_eq!(envelope.to, client);
    }

    #[tokio::test]
    async fn test_udp_local_endpoint_short_circuits() {
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let b = NodeId::named("rm-b");
        let mut mailbox = transport.register(b.clone());

        // Receive loop not started: delivery must not go through the socket.
        transport.send(ack(&NodeId::named("rm-a"), &b)).unwrap();

        assert!(mailbox.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_udp_unknown_endpoint() {
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();

        let result = transport.send(ack(&NodeId::named("rm-a"), &NodeId::named("rm-z")));

        assert!(matches!(result, Err(ClusterError::UnknownEndpoint(_))));
    }

    #[tokio::test]
    async fn test_udp_oversized_envelope_rejected_before_queueing() {
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let b = NodeId::named("rm-b");
        transport.add_peer(PeerAddress {
            id: b.clone(),
            addr: "127.0.0.1:9".parse().unwrap(),
        });
        let query = Message::LookupQuery {
            lookup: LookupId(1),
            resource: "x".repeat(70_000),
        };

        let result = transport.send(Envelope::new(NodeId::named("rm-a"), b, query));

        assert!(matches!(result, Err(ClusterError::Oversized(_, _))));
    }

    #[tokio::test]
    async fn test_udp_burst_sent_immediately_after_bind_is_delivered() {
        // ARRANGE: the sender's socket has never been polled for write readiness
        let receiver = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        receiver.start();
        let b = NodeId::named("rm-b");
        let mut mailbox = receiver.register(b.clone());
        let sender = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        sender.add_peer(PeerAddress {
            id: b.clone(),
            addr: receiver.local_addr(),
        });

        // ACT: every send is accepted synchronously
        for _ in 0..20 {
            sender.send(ack(&NodeId::named("rm-a"), &b)).expect("send failed");
        }

        // ASSERT
        let envelope = tokio::time::timeout(Duration::from_secs(2), mailbox.recv())
            .await
            .expect("timed out")
            .expect("mailbox closed");
        assert_eq!(envelope.to, b);
    }

    #[tokio::test]
    async fn test_udp_garbage_datagram_does_not_stop_receiver() {
        let receiver = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        receiver.start();
        let b = NodeId::named("rm-b");
        let mut mailbox = receiver.register(b.clone());

        let sender = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        sender.add_peer(PeerAddress {
            id: b.clone(),
            addr: receiver.local_addr(),
        });

        let raw = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        raw.send_to(&[0xde, 0xad, 0xbe, 0xef], receiver.local_addr())
            .await
            .unwrap();

        sender.send(ack(&NodeId::named("rm-a"), &b)).unwrap();

        let envelope = tokio::time::timeout(Duration::from_secs(2), mailbox.recv())
            .await
            .expect("timed out")
            .expect("mailbox closed");
        assert_eq!(envelope.to, b);
    }
}
