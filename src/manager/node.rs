use crate::catalog::catalog::LocalCatalog;
use crate::catalog::roster::ClientRoster;
use crate::error::ClusterError;
use crate::lookup::tracker::PendingLookupTracker;
use crate::lookup::types::{LookupStart, ResponseOutcome};
use crate::membership::directory::PeerDirectory;
use crate::membership::types::NodeId;
use crate::protocol::types::{
    AccessReply, AccessRequest, BootstrapStep, Delivery, DenialReason, Envelope, LookupId, Message,
};
use crate::telemetry::sink::LogSink;
use crate::telemetry::types::LogRecord;
use crate::transport::{Mailbox, Transport};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Tunables of a single manager.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    /// How long a lookup may wait for peer answers. `None` waits indefinitely.
    pub lookup_timeout: Option<Duration>,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            lookup_timeout: Some(DEFAULT_LOOKUP_TIMEOUT),
        }
    }
}

/// One coordinator node.
///
/// All state is private to the manager and only mutated from `handle_envelope` and
/// `expire_lookup`, which the event loop calls one at a time.
pub struct ResourceManager {
    id: NodeId,
    catalog: LocalCatalog,
    clients: ClientRoster,
    peers: PeerDirectory,
    tracker: PendingLookupTracker,
    transport: Arc<dyn Transport>,
    log: LogSink,
    settings: ManagerSettings,
    deadline_tx: mpsc::UnboundedSender<LookupId>,
    deadline_rx: Option<mpsc::UnboundedReceiver<LookupId>>,
    deadlines: HashMap<LookupId, AbortHandle>,
}

/// Running manager task.
pub struct ManagerHandle {
    pub id: NodeId,
    pub task: JoinHandle<()>,
}

impl ResourceManager {
    pub fn new(
        id: NodeId,
        transport: Arc<dyn Transport>,
        log: LogSink,
        settings: ManagerSettings,
    ) -> Self {
        let (deadline_tx, deadline_rx) = mpsc::unbounded_channel();

        Self {
            id,
            catalog: LocalCatalog::new(),
            clients: ClientRoster::new(),
            peers: PeerDirectory::new(),
            tracker: PendingLookupTracker::new(),
            transport,
            log,
            settings,
            deadline_tx,
            deadline_rx: Some(deadline_rx),
            deadlines: HashMap::new(),
        }
    }

    /// Registers the manager on `transport` and spawns its event loop.
    pub fn spawn(
        id: NodeId,
        transport: Arc<dyn Transport>,
        log: LogSink,
        settings: ManagerSettings,
    ) -> ManagerHandle {
        let mailbox = transport.register(id.clone());
        let manager = Self::new(id.clone(), transport, log, settings);

        let task = tokio::spawn(async move {
            manager.run(mailbox).await;
        });

        ManagerHandle { id, task }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn catalog(&self) -> &LocalCatalog {
        &self.catalog
    }

    /// Direct catalog access for code that embeds a manager and drives it by hand before
    /// `run` takes ownership. No message toggles resource status, so a spawned manager's
    /// catalog only changes through bootstrap.
    pub fn catalog_mut(&mut self) -> &mut LocalCatalog {
        &mut self.catalog
    }

    pub fn peers(&self) -> &PeerDirectory {
        &self.peers
    }

    pub fn clients(&self) -> &ClientRoster {
        &self.clients
    }

    pub fn tracker(&self) -> &PendingLookupTracker {
        &self.tracker
    }

    /// Processes events until the mailbox closes.
    pub async fn run(mut self, mut mailbox: Mailbox) {
        let Some(mut deadlines) = self.deadline_rx.take() else {
            tracing::error!("Manager {} started twice", self.id);
            return;
        };

        tracing::info!("Resource manager {} running", self.id);

        loop {
            tokio::select! {
                envelope = mailbox.recv() => match envelope {
                    Some(envelope) => self.handle_envelope(envelope),
                    None => break,
                },
                Some(lookup) = deadlines.recv() => self.expire_lookup(lookup),
            }
        }

        for (_, handle) in self.deadlines.drain() {
            handle.abort();
        }
        tracing::info!("Resource manager {} stopped", self.id);
    }

    pub fn handle_envelope(&mut self, envelope: Envelope) {
        let Envelope { from, body, .. } = envelope;

        match body {
            Message::SetLocalResources(resources) => {
                self.catalog.install(resources);
                self.ack(&from, BootstrapStep::LocalResources);
            }

            Message::SetLocalClients(clients) => {
                let count = self.clients.install(clients);
                tracing::info!("{} has {} local clients", self.id, count);
                self.ack(&from, BootstrapStep::LocalClients);
            }

            Message::SetPeers(peers) => {
                let count = self.peers.install(&self.id, peers);
                tracing::info!("{} knows {} peer managers", self.id, count);
                self.ack(&from, BootstrapStep::Peers);
            }

            Message::LookupQuery { lookup, resource } => {
                self.answer_query(from, lookup, resource);
            }

            Message::LookupResponse {
                lookup,
                resource,
                found,
                responder,
            } => {
                self.on_lookup_response(lookup, &resource, found, &responder);
            }

            Message::AccessRequest { request, delivery } => {
                self.handle_access_request(request, delivery);
            }

            unhandled @ (Message::BootstrapAck(_) | Message::AccessReply(_)) => {
                self.unhandled(from, unhandled.kind());
            }
        }
    }

    /// Resolves a lookup whose deadline fired, if it is still pending.
    pub fn expire_lookup(&mut self, lookup: LookupId) {
        self.deadlines.remove(&lookup);

        match self.tracker.expire(lookup) {
            Some(pending) => {
                tracing::warn!(
                    "{}: {} for '{}' timed out after {:?} with {} peers silent",
                    self.id,
                    lookup,
                    pending.resource(),
                    pending.started_at.elapsed(),
                    pending.remaining()
                );
                self.handle_access_request(
                    pending.request,
                    Delivery::Unowned(DenialReason::LookupTimedOut),
                );
            }
            None => {
                tracing::trace!("{}: deadline for resolved {} ignored", self.id, lookup);
            }
        }
    }

    fn answer_query(&self, from: NodeId, lookup: LookupId, resource: String) {
        let found = self.catalog.has(&resource);
        tracing::debug!(
            "{}: {} asks who has '{}' -> {}",
            self.id,
            from,
            resource,
            found
        );

        self.send(
            from,
            Message::LookupResponse {
                lookup,
                resource,
                found,
                responder: self.id.clone(),
            },
        );
    }

    fn on_lookup_response(
        &mut self,
        lookup: LookupId,
        resource: &str,
        found: bool,
        responder: &NodeId,
    ) {
        match self.tracker.on_response(lookup, resource, found, responder) {
            ResponseOutcome::Forward { owner, request } => {
                self.cancel_deadline(lookup);
                self.log.record(LogRecord::Forwarded {
                    node: self.id.clone(),
                    resource: request.resource.clone(),
                    owner: owner.clone(),
                });
                tracing::debug!("{}: forwarding '{}' to {}", self.id, request.resource, owner);
                self.forward(owner, request);
            }
            ResponseOutcome::Exhausted { request } => {
                self.cancel_deadline(lookup);
                self.handle_access_request(
                    request,
                    Delivery::Unowned(DenialReason::ResourceNotFound),
                );
            }
            ResponseOutcome::Waiting { remaining } => {
                tracing::trace!(
                    "{}: {} still awaiting {} peers",
                    self.id,
                    lookup,
                    remaining
                );
            }
            ResponseOutcome::Stray => {
                self.log.record(LogRecord::StrayResponse {
                    node: self.id.clone(),
                    resource: resource.to_string(),
                    responder: responder.clone(),
                });
            }
        }
    }

    /// The standard request path. Unowned re-injections end here as denials.
    fn handle_access_request(&mut self, request: AccessRequest, delivery: Delivery) {
        if let Some(resource) = self.catalog.lookup(&request.resource) {
            if resource.is_enabled() {
                self.grant(request);
            } else {
                self.deny(request, DenialReason::ResourceDisabled);
            }
            return;
        }

        match delivery {
            Delivery::Direct => self.initiate_lookup(request),
            Delivery::Forwarded => {
                tracing::warn!(
                    "{}: forwarded request for '{}' but resource is not local",
                    self.id,
                    request.resource
                );
                self.deny(request, DenialReason::ResourceNotFound);
            }
            Delivery::Unowned(reason) => self.deny(request, reason),
        }
    }

    fn initiate_lookup(&mut self, request: AccessRequest) {
        let resource = request.resource.clone();

        let (lookup, peers) = match self.tracker.begin(request, &self.peers) {
            LookupStart::Querying { id, peers } => (id, peers),
            LookupStart::Exhausted { request } => {
                tracing::debug!("{}: no peers to ask about '{}'", self.id, resource);
                self.handle_access_request(
                    request,
                    Delivery::Unowned(DenialReason::ResourceNotFound),
                );
                return;
            }
        };

        self.log.record(LogRecord::LookupStarted {
            node: self.id.clone(),
            resource: resource.clone(),
            lookup,
            peers: peers.len(),
        });
        self.schedule_deadline(lookup);

        // A peer with no route can never answer, so it counts as declining. Any other send
        // failure leaves the peer awaited and the deadline decides.
        let mut unreachable = Vec::new();
        for peer in peers {
            let envelope = Envelope::new(
                self.id.clone(),
                peer.clone(),
                Message::LookupQuery {
                    lookup,
                    resource: resource.clone(),
                },
            );
            match self.transport.send(envelope) {
                Ok(()) => {}
                Err(e @ (ClusterError::UnknownEndpoint(_) | ClusterError::MailboxClosed(_))) => {
                    tracing::warn!("{}: peer {} unreachable: {}", self.id, peer, e);
                    unreachable.push(peer);
                }
                Err(e) => {
                    tracing::warn!("{}: query to {} failed: {}", self.id, peer, e);
                }
            }
        }

        for peer in unreachable {
            self.on_lookup_response(lookup, &resource, false, &peer);
        }
    }

    /// Hands `request` to its owner. The lookup is already resolved, so an owner that
    /// cannot be reached gets the requester a denial instead of silence.
    fn forward(&self, owner: NodeId, request: AccessRequest) {
        let envelope = Envelope::new(
            self.id.clone(),
            owner.clone(),
            Message::AccessRequest {
                request: request.clone(),
                delivery: Delivery::Forwarded,
            },
        );

        if let Err(e) = self.transport.send(envelope) {
            tracing::warn!(
                "{}: forwarding '{}' to {} failed: {}",
                self.id,
                request.resource,
                owner,
                e
            );
            self.deny(request, DenialReason::ResourceNotFound);
        }
    }

    fn grant(&self, request: AccessRequest) {
        self.log.record(LogRecord::Granted {
            node: self.id.clone(),
            resource: request.resource.clone(),
            requester: request.requester.clone(),
            local_client: self.clients.is_local(&request.requester),
        });

        let reply = AccessReply::granted(&request, self.id.clone());
        self.send(request.requester, Message::AccessReply(reply));
    }

    fn deny(&self, request: AccessRequest, reason: DenialReason) {
        self.log.record(LogRecord::Denied {
            node: self.id.clone(),
            resource: request.resource.clone(),
            requester: request.requester.clone(),
            reason,
        });

        let reply = AccessReply::denied(&request, reason);
        self.send(request.requester, Message::AccessReply(reply));
    }

    fn schedule_deadline(&mut self, lookup: LookupId) {
        let Some(timeout) = self.settings.lookup_timeout else {
            return;
        };

        let tx = self.deadline_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = tx.send(lookup);
        });
        self.deadlines.insert(lookup, task.abort_handle());
    }

    fn cancel_deadline(&mut self, lookup: LookupId) {
        if let Some(handle) = self.deadlines.remove(&lookup) {
            handle.abort();
        }
    }

    fn ack(&self, to: &NodeId, step: BootstrapStep) {
        self.send(to.clone(), Message::BootstrapAck(step));
    }

    fn unhandled(&self, from: NodeId, kind: &'static str) {
        let error = ClusterError::Unhandled {
            kind,
            from: from.clone(),
        };
        tracing::warn!("{}: {}", self.id, error);

        self.log.record(LogRecord::Unhandled {
            node: self.id.clone(),
            kind: kind.to_string(),
            from,
        });
    }

    fn send(&self, to: NodeId, body: Message) {
        let kind = body.kind();
        if let Err(e) = self
            .transport
            .send(Envelope::new(self.id.clone(), to, body))
        {
            tracing::warn!("{}: failed to send {}: {}", self.id, kind, e);
        }
    }
}
