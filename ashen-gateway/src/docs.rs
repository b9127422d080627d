//! OpenAPI documentation for the gateway
//!
//! [`ApiDoc`] collects every annotated handler. The document is served at
//! `/api-docs/openapi.json` and rendered by Swagger UI at `/api-docs`.
//!
//! Shared record types stay free of utoipa derives; [`schemas`] mirrors
//! their wire shape for documentation only.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;

/// Swagger UI mount point
pub const DOCS_PATH: &str = "/api-docs";
/// Raw OpenAPI document
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Wire shapes of shared records, for documentation only
pub mod schemas {
    use utoipa::ToSchema;

    /// Hypermedia link
    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct Link {
        #[schema(example = "self")]
        rel: String,
        #[schema(example = "/api/gateway/guilds/1")]
        href: String,
        /// Present for state-changing operations
        #[schema(example = "POST")]
        method: Option<String>,
    }

    /// Character with its links
    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct Character {
        id: i64,
        #[schema(example = "Solaire")]
        name: String,
        #[schema(minimum = 1, maximum = 99)]
        level: i64,
        links: Vec<Link>,
    }

    /// Guild with its links
    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct Guild {
        id: i64,
        #[schema(example = "Warriors of Sunlight")]
        name: String,
        description: Option<String>,
        leader: Option<String>,
        member_count: i64,
        /// Only with `?include=members`
        members: Option<Vec<GuildMember>>,
        /// Set instead of `members` when that guild's fetch failed
        members_error: Option<String>,
        links: Vec<Link>,
    }

    /// Guild membership
    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct GuildMember {
        id: i64,
        character_name: String,
        guild_id: Option<i64>,
        #[schema(example = "Member")]
        rank: Option<String>,
        join_date: Option<String>,
        links: Vec<Link>,
    }

    /// Error body shared by every failing response
    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct ErrorBody {
        #[schema(example = "Guild not found")]
        error: String,
        message: Option<String>,
        details: Option<serde_json::Value>,
        links: Vec<Link>,
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ashen Network API Gateway",
        description = "Aggregates the REST character service and the SOAP guild service."
    ),
    paths(
        api::index::index,
        api::health::health,
        api::characters::list_characters,
        api::characters::create_character,
        api::characters::get_character,
        api::characters::character_items,
        api::characters::add_character_item,
        api::guilds::list_guilds,
        api::guilds::create_guild,
        api::guilds::get_guild,
        api::guilds::join_guild,
        api::guilds::guild_members,
        api::dashboard::dashboard,
    ),
    components(schemas(
        schemas::Link,
        schemas::Character,
        schemas::Guild,
        schemas::GuildMember,
        schemas::ErrorBody,
        api::characters::CreateCharacterRequest,
        api::characters::AddItemRequest,
        api::guilds::CreateGuildRequest,
        api::guilds::JoinGuildRequest,
    )),
    tags(
        (name = "gateway", description = "Index and health"),
        (name = "characters", description = "Proxied to the REST character service"),
        (name = "guilds", description = "Proxied to the SOAP guild service"),
        (name = "dashboard", description = "Combined view over both backends")
    )
)]
pub struct ApiDoc;

/// Swagger UI plus the raw document, ready to merge into a router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_gateway_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/api/gateway/health",
            "/api/gateway/characters",
            "/api/gateway/characters/{id}/items",
            "/api/gateway/guilds/join",
            "/api/gateway/guilds/{id}/members",
            "/api/gateway/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_error_schema_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("ErrorBody"));
        assert!(schemas.contains_key("CreateCharacterRequest"));
    }
}
