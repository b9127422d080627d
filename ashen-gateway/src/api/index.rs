//! Entry point listing

use axum::Json;
use serde::Serialize;

use ashen_common::Link;

use crate::links::{view_links, View};

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub description: String,
    pub version: String,
    pub links: Vec<Link>,
}

/// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "gateway",
    responses((status = 200, description = "Entry point with links to every collection"))
)]
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Ashen Network API Gateway".to_string(),
        description: "Aggregates the REST character service and the SOAP guild service"
            .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        links: view_links(View::Index),
    })
}
