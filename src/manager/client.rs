//! Access Client
//!
//! Requester-side helper: submits an `AccessRequest` to a manager from a short-lived
//! endpoint and waits for the matching `AccessReply`.

use crate::error::{ClusterError, ClusterResult};
use crate::membership::types::NodeId;
use crate::protocol::types::{AccessMode, AccessReply, AccessRequest, Delivery, Envelope, Message};
use crate::transport::{Mailbox, Transport};

use std::sync::Arc;
use std::time::Duration;

pub struct AccessClient {
    transport: Arc<dyn Transport>,
    manager: NodeId,
    reply_timeout: Duration,
}

impl AccessClient {
    pub fn new(transport: Arc<dyn Transport>, manager: NodeId, reply_timeout: Duration) -> Self {
        Self {
            transport,
            manager,
            reply_timeout,
        }
    }

    pub fn manager(&self) -> &NodeId {
        &self.manager
    }

    /// Asks the manager for `resource` and waits for the final answer.
    pub async fn request(&self, resource: &str, mode: AccessMode) -> ClusterResult<AccessReply> {
        let me = self
            .transport
            .endpoint(&format!("client-{}", uuid::Uuid::new_v4()));
        let mut mailbox = self.transport.register(me.clone());
        let request = AccessRequest::new(resource, mode, me.clone());

        let result = self.submit(&me, &mut mailbox, request).await;
        self.transport.unregister(&me);
        result
    }

    async fn submit(
        &self,
        me: &NodeId,
        mailbox: &mut Mailbox,
        request: AccessRequest,
    ) -> ClusterResult<AccessReply> {
        let request_id = request.request_id;
        self.transport.send(Envelope::new(
            me.clone(),
            self.manager.clone(),
            Message::AccessRequest {
                request,
                delivery: Delivery::Direct,
            },
        ))?;

        let wait = async {
            while let Some(envelope) = mailbox.recv().await {
                match envelope.body {
                    Message::AccessReply(reply) if reply.request_id == request_id => {
                        return Ok(reply);
                    }
                    other => {
                        tracing::debug!("Client {} ignoring {}", me, other.kind());
                    }
                }
            }
            Err(ClusterError::MailboxClosed(me.clone()))
        };

        tokio::time::timeout(self.reply_timeout, wait)
            .await
            .map_err(|_| ClusterError::Timeout("access reply"))?
    }
}
