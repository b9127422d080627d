//! OpenAPI document for the character service, served with Swagger UI at
//! `/api-docs`.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Documentation-only mirrors of the shared records
pub mod schemas {
    use utoipa::ToSchema;

    #[derive(ToSchema, serde::Serialize)]
    #[allow(dead_code)]
    pub struct Link {
        rel: String,
        #[schema(example = "/api/characters/1")]
        href: String,
        method: Option<String>,
    }

    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct Character {
        id: i64,
        name: String,
        #[schema(minimum = 1, maximum = 99)]
        level: i64,
        links: Vec<Link>,
    }

    #[derive(ToSchema, serde::Serialize)]
    #[allow(dead_code)]
    pub struct Item {
        id: i64,
        #[schema(example = "Drakeblood Greatsword")]
        name: String,
        #[serde(rename = "type")]
        #[schema(example = "weapon")]
        item_type: String,
        links: Vec<Link>,
    }

    /// Inventory: the character's name and the items it carries
    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct CharacterItems {
        character: String,
        items: Vec<Item>,
        links: Vec<Link>,
    }

    #[derive(ToSchema)]
    #[allow(dead_code)]
    pub struct ErrorBody {
        #[schema(example = "Character not found")]
        error: String,
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Ashen Network Character Service"),
    paths(
        api::health::health_check,
        api::characters::list_characters,
        api::characters::create_character,
        api::characters::get_character,
        api::characters::list_character_items,
        api::characters::add_character_item,
        api::items::list_items,
        api::items::create_item,
        api::items::get_item,
    ),
    components(schemas(
        schemas::Link,
        schemas::Character,
        schemas::Item,
        schemas::CharacterItems,
        schemas::ErrorBody,
        api::characters::CreateCharacterRequest,
        api::characters::AddItemRequest,
        api::items::CreateItemRequest,
    )),
    tags(
        (name = "characters", description = "Characters and their inventories"),
        (name = "items", description = "Item catalogue"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}
