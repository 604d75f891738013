//! UDP Transport
//!
//! One socket per process. Outgoing envelopes addressed to an endpoint registered in this
//! process are delivered in memory; everything else is encoded and sent to the address
//! found in the address book, or embedded in the identity itself (`name@host:port`).
//!
//! Remote sends never touch the socket directly: `send` resolves and encodes the envelope,
//! then queues the datagram for a writer task that owns the `send_to(..).await` calls.
//! Only resolution and encoding failures are reported to the caller.
//!
//! The receive loop decodes each datagram and hands it to the local endpoint named in
//! `Envelope::to`. Undecodable or misaddressed datagrams are dropped with a warning.

use super::{Mailbox, Transport};
use crate::error::{ClusterError, ClusterResult};
use crate::membership::types::{NodeId, PeerAddress};
use crate::protocol::codec;
use crate::protocol::types::Envelope;

use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type Datagram = (Vec<u8>, SocketAddr);

pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
    address_book: DashMap<NodeId, SocketAddr>,
    endpoints: DashMap<NodeId, mpsc::UnboundedSender<Envelope>>,
    outbox: mpsc::UnboundedSender<Datagram>,
}

impl UdpTransport {
    /// Binds the socket and spawns the datagram writer. Must be called inside a runtime.
    pub async fn bind(bind_addr: SocketAddr) -> ClusterResult<Arc<Self>> {
        let socket = Arc::new(UdpSocket::bind(bind_addr).await?);
        let local_addr = socket.local_addr()?;
        let (outbox, queued) = mpsc::unbounded_channel();

        tokio::spawn(write_loop(socket.clone(), queued));
        tracing::info!("UDP transport bound to {}", local_addr);

        Ok(Arc::new(Self {
            socket,
            local_addr,
            address_book: DashMap::new(),
            endpoints: DashMap::new(),
            outbox,
        }))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn add_peer(&self, peer: PeerAddress) {
        tracing::debug!("Address book: {} -> {}", peer.id, peer.addr);
        self.address_book.insert(peer.id, peer.addr);
    }

    pub fn add_peers(&self, peers: impl IntoIterator<Item = PeerAddress>) {
        for peer in peers {
            self.add_peer(peer);
        }
    }

    fn resolve(&self, id: &NodeId) -> Option<SocketAddr> {
        self.address_book
            .get(id)
            .map(|entry| *entry.value())
            .or_else(|| id.socket_addr())
    }

    fn local_sender(&self, id: &NodeId) -> Option<mpsc::UnboundedSender<Envelope>> {
        self.endpoints.get(id).map(|entry| entry.value().clone())
    }

    fn deliver_local(&self, envelope: Envelope) -> Option<ClusterResult<()>> {
        let tx = self.local_sender(&envelope.to)?;
        let to = envelope.to.clone();
        Some(tx.send(envelope).map_err(|_| ClusterError::MailboxClosed(to)))
    }

    /// Spawns the datagram receive loop.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let transport = self.clone();
        tokio::spawn(async move {
            transport.receive_loop().await;
        })
    }

    async fn receive_loop(self: Arc<Self>) {
        let mut buf = vec![0u8; 65536];

        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, src)) => match codec::decode(&buf[..len]) {
                    Ok(envelope) => {
                        tracing::trace!(
                            "Received {} from {} ({})",
                            envelope.body.kind(),
                            envelope.from,
                            src
                        );
                        match self.deliver_local(envelope) {
                            Some(Ok(())) => {}
                            Some(Err(e)) => {
                                tracing::warn!("Dropping datagram from {}: {}", src, e);
                            }
                            None => {
                                tracing::warn!(
                                    "Dropping datagram from {}: no local endpoint for recipient",
                                    src
                                );
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Unhandled datagram from {}: {}", src, e);
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to receive UDP packet: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}

/// Drains queued datagrams until every `UdpTransport` handle is gone.
async fn write_loop(socket: Arc<UdpSocket>, mut queued: mpsc::UnboundedReceiver<Datagram>) {
    while let Some((bytes, addr)) = queued.recv().await {
        if let Err(e) = socket.send_to(&bytes, addr).await {
            tracing::warn!("Failed to send {} bytes to {}: {}", bytes.len(), addr, e);
        }
    }
    tracing::debug!("UDP writer stopped");
}

impl Transport for UdpTransport {
    fn send(&self, envelope: Envelope) -> ClusterResult<()> {
        if let Some(tx) = self.local_sender(&envelope.to) {
            let to = envelope.to.clone();
            return tx.send(envelope).map_err(|_| ClusterError::MailboxClosed(to));
        }

        let addr = self
            .resolve(&envelope.to)
            .ok_or_else(|| ClusterError::UnknownEndpoint(envelope.to.clone()))?;
        let bytes = codec::encode(&envelope)?;

        self.outbox
            .send((bytes, addr))
            .map_err(|_| ClusterError::WriterStopped)
    }

    fn register(&self, id: NodeId) -> Mailbox {
        let (tx, rx) = mpsc::unbounded_channel();
        self.endpoints.insert(id, tx);
        rx
    }

    fn unregister(&self, id: &NodeId) {
        self.endpoints.remove(id);
    }

    fn endpoint(&self, name: &str) -> NodeId {
        NodeId::at(name, self.local_addr)
    }
}
