//! Character endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use ashen_common::models::{Character, CharacterItems, NewCharacter};
use ashen_common::{Link, Linked};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/characters body; fields are optional so missing ones become a 400
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCharacterRequest {
    pub name: Option<String>,
    pub level: Option<i64>,
}

/// POST /api/characters/:id/items body
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub item_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub message: String,
    pub links: Vec<Link>,
}

fn character_links(id: i64) -> Vec<Link> {
    vec![
        Link::new("self", format!("/api/characters/{}", id)),
        Link::new("items", format!("/api/characters/{}/items", id)),
    ]
}

fn inventory_links(id: i64) -> Vec<Link> {
    vec![
        Link::new("self", format!("/api/characters/{}/items", id)),
        Link::new("character", format!("/api/characters/{}", id)),
    ]
}

/// GET /api/characters
#[utoipa::path(
    get,
    path = "/api/characters",
    tag = "characters",
    responses((status = 200, description = "All characters", body = [crate::docs::schemas::Character]))
)]
pub async fn list_characters(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Linked<Character>>>> {
    let characters = db::characters::list_characters(&state.db).await?;

    Ok(Json(
        characters
            .into_iter()
            .map(|c| {
                let links = character_links(c.id);
                Linked::new(c, links)
            })
            .collect(),
    ))
}

/// POST /api/characters
#[utoipa::path(
    post,
    path = "/api/characters",
    tag = "characters",
    request_body = CreateCharacterRequest,
    responses(
        (status = 201, description = "Character created", body = crate::docs::schemas::Character),
        (status = 400, description = "Missing fields or level outside 1..=99", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn create_character(
    State(state): State<AppState>,
    payload: Result<Json<CreateCharacterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Linked<Character>>)> {
    let Json(request) = payload?;

    let (Some(name), Some(level)) = (request.name, request.level) else {
        return Err(ApiError::BadRequest("name and level are required".to_string()));
    };

    let new = NewCharacter { name, level };
    new.validate().map_err(ApiError::BadRequest)?;

    let created = db::characters::insert_character(&state.db, &new).await?;
    info!(id = created.id, name = %created.name, "Created character");

    let links = character_links(created.id);
    Ok((StatusCode::CREATED, Json(Linked::new(created, links))))
}

/// GET /api/characters/:id
#[utoipa::path(
    get,
    path = "/api/characters/{id}",
    tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    responses(
        (status = 200, description = "The character", body = crate::docs::schemas::Character),
        (status = 404, description = "No such character", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Linked<Character>>> {
    let character = db::characters::get_character(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Character not found".to_string()))?;

    Ok(Json(Linked::new(character, character_links(id))))
}

/// GET /api/characters/:id/items
#[utoipa::path(
    get,
    path = "/api/characters/{id}/items",
    tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    responses(
        (status = 200, description = "Character name and items", body = crate::docs::schemas::CharacterItems),
        (status = 404, description = "No such character", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn list_character_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Linked<CharacterItems>>> {
    let character = db::characters::get_character(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Character not found".to_string()))?;

    let items = db::characters::items_for_character(&state.db, id).await?;

    Ok(Json(Linked::new(
        CharacterItems {
            character: character.name,
            items,
        },
        inventory_links(id),
    )))
}

/// POST /api/characters/:id/items
#[utoipa::path(
    post,
    path = "/api/characters/{id}/items",
    tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Item attached; attaching twice is a no-op"),
        (status = 400, description = "Missing item_id", body = crate::docs::schemas::ErrorBody),
        (status = 404, description = "Unknown character or item", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn add_character_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AddItemResponse>)> {
    let Json(request) = payload?;
    let item_id = request
        .item_id
        .ok_or_else(|| ApiError::BadRequest("item_id is required".to_string()))?;

    let character = db::characters::get_character(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Character not found".to_string()))?;
    let item = db::items::get_item(&state.db, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    let added = db::characters::add_item_to_character(&state.db, id, item_id).await?;
    info!(character_id = id, item_id, added, "Attached item to character");

    Ok((
        StatusCode::CREATED,
        Json(AddItemResponse {
            message: format!("Item '{}' added to character '{}'", item.name, character.name),
            links: inventory_links(id),
        }),
    ))
}
