//! Manager Bootstrap
//!
//! Installs a manager's resources, clients and peers by message, the same way any other
//! endpoint talks to it, and waits until each step is acknowledged. Must complete before
//! the manager sees lookup traffic.

use crate::catalog::types::Resource;
use crate::error::{ClusterError, ClusterResult};
use crate::membership::types::NodeId;
use crate::protocol::types::{BootstrapStep, Envelope, Message};
use crate::transport::{Mailbox, Transport};

use std::time::Duration;

/// Everything a manager needs before it can serve requests.
#[derive(Debug, Clone, Default)]
pub struct BootstrapPlan {
    pub resources: Vec<Resource>,
    pub clients: Vec<NodeId>,
    pub peers: Vec<NodeId>,
}

/// Sends the three bootstrap messages to `manager` and waits for all acknowledgements.
pub async fn bootstrap(
    transport: &dyn Transport,
    manager: &NodeId,
    plan: BootstrapPlan,
    timeout: Duration,
) -> ClusterResult<()> {
    let me = transport.endpoint(&format!("bootstrap-{}", uuid::Uuid::new_v4()));
    let mut mailbox = transport.register(me.clone());

    let result = send_and_await(transport, &me, &mut mailbox, manager, plan, timeout).await;
    transport.unregister(&me);

    if result.is_ok() {
        tracing::info!("Manager {} bootstrapped", manager);
    }
    result
}

async fn send_and_await(
    transport: &dyn Transport,
    me: &NodeId,
    mailbox: &mut Mailbox,
    manager: &NodeId,
    plan: BootstrapPlan,
    timeout: Duration,
) -> ClusterResult<()> {
    let steps = [
        Message::SetLocalResources(plan.resources),
        Message::SetLocalClients(plan.clients),
        Message::SetPeers(plan.peers),
    ];
    for body in steps {
        transport.send(Envelope::new(me.clone(), manager.clone(), body))?;
    }

    let mut pending = vec![
        BootstrapStep::LocalResources,
        BootstrapStep::LocalClients,
        BootstrapStep::Peers,
    ];

    let wait = async {
        while !pending.is_empty() {
            let Some(envelope) = mailbox.recv().await else {
                return Err(ClusterError::MailboxClosed(me.clone()));
            };
            match envelope.body {
                Message::BootstrapAck(step) => {
                    tracing::debug!("{} acknowledged {:?}", envelope.from, step);
                    pending.retain(|s| *s != step);
                }
                other => {
                    tracing::warn!(
                        "Ignoring {} from {} during bootstrap",
                        other.kind(),
                        envelope.from
                    );
                }
            }
        }
        Ok(())
    };

    tokio::time::timeout(timeout, wait)
        .await
        .map_err(|_| ClusterError::Timeout("bootstrap acknowledgements"))?
}
