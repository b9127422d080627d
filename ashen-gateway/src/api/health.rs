//! Gateway health endpoint
//!
//! Always answers 200: an unreachable backend shows up as `disconnected`
//! in the body, never as a failed request.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use ashen_common::Link;

use crate::links::{view_links, View};
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl From<bool> for Connectivity {
    fn from(reachable: bool) -> Self {
        if reachable {
            Connectivity::Connected
        } else {
            Connectivity::Disconnected
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub rest: Connectivity,
    pub soap: Connectivity,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub gateway: String,
    pub timestamp: String,
    pub services: ServiceStatus,
    pub links: Vec<Link>,
}

/// GET /api/gateway/health
#[utoipa::path(
    get,
    path = "/api/gateway/health",
    tag = "gateway",
    responses((
        status = 200,
        description = "Gateway status and per-backend connectivity; unreachable backends are reported, never an error"
    ))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (rest, soap) = tokio::join!(state.rest.probe(), state.soap.probe());
    tracing::debug!(rest, soap, "Backend probes finished");

    Json(HealthResponse {
        gateway: "running".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        services: ServiceStatus {
            rest: rest.into(),
            soap: soap.into(),
        },
        links: view_links(View::Health),
    })
}
