use super::types::LogRecord;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sending half of the log channel, cloned into every manager.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    tx: Option<mpsc::UnboundedSender<LogRecord>>,
}

impl LogSink {
    /// Creates a sink together with the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LogRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards every record.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn record(&self, record: LogRecord) {
        if let Some(tx) = &self.tx
            && tx.send(record).is_err()
        {
            tracing::trace!("Log sink closed, dropping record");
        }
    }
}

/// Spawns a task that turns log records into `tracing` events.
pub fn spawn_tracing_sink(mut rx: mpsc::UnboundedReceiver<LogRecord>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            emit(&record);
        }
        tracing::debug!("Log sink drained");
    })
}

fn emit(record: &LogRecord) {
    match record {
        LogRecord::LookupStarted {
            node,
            resource,
            lookup,
            peers,
        } => {
            tracing::info!(%node, %resource, %lookup, peers, "lookup started");
        }
        LogRecord::Forwarded {
            node,
            resource,
            owner,
        } => {
            tracing::info!(%node, %resource, %owner, "request forwarded to owner");
        }
        LogRecord::Granted {
            node,
            resource,
            requester,
            local_client,
        } => {
            tracing::info!(%node, %resource, %requester, local_client, "access granted");
        }
        LogRecord::Denied {
            node,
            resource,
            requester,
            reason,
        } => {
            tracing::info!(%node, %resource, %requester, %reason, "access denied");
        }
        LogRecord::StrayResponse {
            node,
            resource,
            responder,
        } => {
            tracing::debug!(%node, %resource, %responder, "stray lookup response ignored");
        }
        LogRecord::Unhandled { node, kind, from } => {
            tracing::warn!(%node, %kind, %from, "unhandled message");
        }
    }
}
