use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

use super::types::{
    AccessHttpRequest, AccessHttpResponse, ENDPOINT_ACCESS, ENDPOINT_HEALTH, HealthResponse,
};
use crate::error::ClusterError;
use crate::manager::client::AccessClient;

pub fn router(client: Arc<AccessClient>) -> Router {
    Router::new()
        .route(ENDPOINT_ACCESS, post(handle_access))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(client))
}

pub async fn handle_access(
    Extension(client): Extension<Arc<AccessClient>>,
    Json(req): Json<AccessHttpRequest>,
) -> (StatusCode, Json<AccessHttpResponse>) {
    if req.resource.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AccessHttpResponse::failed(req.resource, "empty resource name")),
        );
    }

    match client.request(&req.resource, req.mode).await {
        Ok(reply) => {
            tracing::info!(
                "Access to '{}' via {}: granted={}",
                reply.resource,
                client.manager(),
                reply.is_granted()
            );
            (StatusCode::OK, Json(reply.into()))
        }
        Err(e @ ClusterError::Timeout(_)) => {
            tracing::warn!("Access to '{}': {}", req.resource, e);
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(AccessHttpResponse::failed(req.resource, "reply_timed_out")),
            )
        }
        Err(e) => {
            tracing::error!("Access to '{}' failed: {}", req.resource, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(AccessHttpResponse::failed(req.resource, e.to_string())),
            )
        }
    }
}

pub async fn handle_health(
    Extension(client): Extension<Arc<AccessClient>>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            manager: client.manager().to_string(),
        }),
    )
}
