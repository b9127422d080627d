//! ashen-rest library - character and item service
//!
//! Owns characters, items and the character/item association in SQLite and
//! exposes them as JSON with hypermedia links. The gateway proxies to it.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod db;
pub mod docs;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Also serves Swagger UI at `/api-docs`.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route(
            "/api/characters",
            get(api::list_characters).post(api::create_character),
        )
        .route("/api/characters/:id", get(api::get_character))
        .route(
            "/api/characters/:id/items",
            get(api::list_character_items).post(api::add_character_item),
        )
        .route("/api/items", get(api::list_items).post(api::create_item))
        .route("/api/items/:id", get(api::get_item))
        .merge(api::health_routes())
        .merge(docs::swagger_ui())
        .with_state(state)
}
