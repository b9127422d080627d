//! ashen-gateway library - REST + SOAP aggregation gateway
//!
//! Puts the REST character service and the SOAP guild service behind one
//! JSON API. Every response carries hypermedia links; backend failures are
//! translated at the handler boundary, and the health and dashboard views
//! degrade per backend instead of failing as a whole.

use axum::Router;

pub mod api;
pub mod clients;
pub mod config;
pub mod docs;
pub mod error;
pub mod links;
pub mod soap;

use clients::{build_http_client, ClientError, RestClient, SoapClient};
use config::GatewayConfig;

/// Application state shared across HTTP handlers
///
/// Holds only the two backend clients; the gateway keeps no state of its own.
#[derive(Clone)]
pub struct AppState {
    pub rest: RestClient,
    pub soap: SoapClient,
}

impl AppState {
    /// Create new application state
    pub fn new(rest: RestClient, soap: SoapClient) -> Self {
        Self { rest, soap }
    }

    /// Build both clients from resolved configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ClientError> {
        let http = build_http_client(config.request_timeout)?;
        Ok(Self::new(
            RestClient::new(http.clone(), &config.rest_url),
            SoapClient::new(http, &config.soap_url),
        ))
    }
}

/// Build application router
///
/// Gateway routes live under [`links::BASE_PATH`]; `/` is the entry index
/// and `/api-docs` serves the OpenAPI document with Swagger UI.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware::map_response;
    use axum::routing::{get, post};

    let gateway = Router::new()
        .route("/health", get(api::health))
        .route(
            "/characters",
            get(api::list_characters).post(api::create_character),
        )
        .route("/characters/:id", get(api::get_character))
        .route(
            "/characters/:id/items",
            get(api::character_items).post(api::add_character_item),
        )
        .route("/guilds", get(api::list_guilds).post(api::create_guild))
        .route("/guilds/join", post(api::join_guild))
        .route("/guilds/:id", get(api::get_guild))
        .route("/guilds/:id/members", get(api::guild_members))
        .route("/dashboard", get(api::dashboard));

    Router::new()
        .route("/", get(api::index))
        .nest(links::BASE_PATH, gateway)
        .merge(docs::swagger_ui())
        .fallback(api::not_found)
        .layer(map_response(api::method_not_allowed))
        .with_state(state)
}
