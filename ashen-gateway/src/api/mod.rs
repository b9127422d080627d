//! HTTP API handlers for ashen-gateway

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use ashen_common::Link;

use crate::error::{ApiError, ApiResult};
use crate::links::{view_links, View};

pub mod characters;
pub mod dashboard;
pub mod guilds;
pub mod health;
pub mod index;

pub use characters::{
    add_character_item, character_items, create_character, get_character, list_characters,
};
pub use dashboard::dashboard;
pub use guilds::{create_guild, get_guild, guild_members, join_guild, list_guilds};
pub use health::health;
pub use index::index;

/// Labels for the `source` field of proxied responses
pub const REST_SOURCE: &str = "REST API";
pub const SOAP_SOURCE: &str = "SOAP Service";

/// Envelope for data fetched from a backend
#[derive(Debug, Serialize)]
pub struct SourcedResponse<T> {
    pub data: T,
    pub source: &'static str,
    pub links: Vec<Link>,
}

/// Envelope for operations that answer with a message instead of a record
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub source: &'static str,
    pub links: Vec<Link>,
}

/// Parse an `:id` path segment
///
/// Taken as a string so a malformed id gets the JSON error body rather than
/// the extractor's plain-text rejection.
pub(crate) fn parse_id(raw: &str, retry: Link) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid id '{}'", raw), retry))
}

/// Fallback for unmatched routes
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "links": view_links(View::Index),
        })),
    )
}

/// Give axum's bodiless 405 the same JSON shape as every other error
pub async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let body = json!({
        "error": "Method not allowed",
        "links": view_links(View::Index),
    });
    Response::from_parts(parts, Body::from(body.to_string()))
}
