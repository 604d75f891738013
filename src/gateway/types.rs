use crate::protocol::types::{AccessMode, AccessOutcome, AccessReply};
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Public endpoint for resource access requests.
pub const ENDPOINT_ACCESS: &str = "/access";
/// Liveness probe.
pub const ENDPOINT_HEALTH: &str = "/health";

// --- Data Transfer Objects ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessHttpRequest {
    pub resource: String,
    #[serde(default = "default_mode")]
    pub mode: AccessMode,
}

fn default_mode() -> AccessMode {
    AccessMode::ConcurrentRead
}

/// Answer for `POST /access`.
///
/// `owner` is set only when the request was granted, `reason` only when it was not.
/// `request_id` is absent when no reply arrived at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessHttpResponse {
    pub request_id: Option<String>,
    pub resource: String,
    pub granted: bool,
    pub owner: Option<String>,
    pub reason: Option<String>,
}

impl AccessHttpResponse {
    pub fn failed(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            request_id: None,
            resource: resource.into(),
            granted: false,
            owner: None,
            reason: Some(reason.into()),
        }
    }
}

impl From<AccessReply> for AccessHttpResponse {
    fn from(reply: AccessReply) -> Self {
        let (granted, owner, reason) = match reply.outcome {
            AccessOutcome::Granted { owner } => (true, Some(owner.to_string()), None),
            AccessOutcome::Denied { reason } => (false, None, Some(reason.to_string())),
        };

        Self {
            request_id: Some(reply.request_id.to_string()),
            resource: reply.resource,
            granted,
            owner,
            reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub manager: String,
}
