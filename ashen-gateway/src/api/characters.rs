//! Character endpoints, proxied to the REST service

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use ashen_common::models::{Character, CharacterItems, NewCharacter};
use ashen_common::{Link, Linked};

use super::{parse_id, MessageResponse, SourcedResponse, REST_SOURCE};
use crate::error::{ApiError, ApiResult};
use crate::links::{enrich, path, view_links, Resource, View};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCharacterRequest {
    pub name: Option<String>,
    pub level: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub item_id: Option<i64>,
}

fn retry_create() -> Link {
    Link::post("retry", path("/characters"))
}

fn retry_list() -> Link {
    Link::new("retry", path("/characters"))
}

/// GET /api/gateway/characters
#[utoipa::path(
    get,
    path = "/api/gateway/characters",
    tag = "characters",
    responses(
        (status = 200, description = "All characters", body = [crate::docs::schemas::Character]),
        (status = 500, description = "REST service failed", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn list_characters(
    State(state): State<AppState>,
) -> ApiResult<Json<SourcedResponse<Vec<Linked<Character>>>>> {
    let characters = state.rest.list_characters().await.map_err(|e| {
        ApiError::from_client(e, "Failed to fetch characters from REST API", retry_list())
    })?;

    Ok(Json(SourcedResponse {
        data: characters
            .into_iter()
            .map(|c| {
                let id = c.id;
                enrich(c, Resource::Character { id })
            })
            .collect(),
        source: REST_SOURCE,
        links: view_links(View::Characters),
    }))
}

/// POST /api/gateway/characters
///
/// Name and level are checked here so an invalid request never reaches the
/// REST service.
#[utoipa::path(
    post,
    path = "/api/gateway/characters",
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
) -> ApiResult<(StatusCode, Json<SourcedResponse<Linked<Character>>>)> {
    let Json(request) =
        payload.map_err(|e| ApiError::validation(e.body_text(), retry_create()))?;

    let (Some(name), Some(level)) = (request.name, request.level) else {
        return Err(ApiError::validation(
            "Name and level are required",
            retry_create(),
        ));
    };

    let new = NewCharacter { name, level };
    new.validate()
        .map_err(|msg| ApiError::validation(msg, retry_create()))?;

    let created = state
        .rest
        .create_character(&new)
        .await
        .map_err(|e| ApiError::from_client(e, "Failed to create character", retry_create()))?;
    info!(id = created.id, name = %created.name, "Character created via gateway");

    let id = created.id;
    Ok((
        StatusCode::CREATED,
        Json(SourcedResponse {
            data: enrich(created, Resource::CreatedCharacter { id }),
            source: REST_SOURCE,
            links: view_links(View::Characters),
        }),
    ))
}

/// GET /api/gateway/characters/:id
#[utoipa::path(
    get,
    path = "/api/gateway/characters/{id}",
    tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    responses(
        (status = 200, description = "The character", body = crate::docs::schemas::Character),
        (status = 404, description = "No such character", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn get_character(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SourcedResponse<Linked<Character>>>> {
    let id = parse_id(&raw_id, retry_list())?;

    let character = state.rest.get_character(id).await.map_err(|e| {
        ApiError::from_client(
            e,
            "Character not found",
            Link::new("characters", path("/characters")),
        )
    })?;

    Ok(Json(SourcedResponse {
        data: enrich(character, Resource::Character { id }),
        source: REST_SOURCE,
        links: view_links(View::Character { id }),
    }))
}

/// GET /api/gateway/characters/:id/items
#[utoipa::path(
    get,
    path = "/api/gateway/characters/{id}/items",
    tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    responses(
        (status = 200, description = "Character name and items"),
        (status = 404, description = "No such character", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn character_items(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SourcedResponse<CharacterItems>>> {
    let id = parse_id(&raw_id, retry_list())?;

    let inventory = state.rest.character_items(id).await.map_err(|e| {
        ApiError::from_client(
            e,
            "Character or items not found",
            Link::new("retry", path(&format!("/characters/{}/items", id))),
        )
    })?;

    Ok(Json(SourcedResponse {
        data: inventory,
        source: REST_SOURCE,
        links: view_links(View::Inventory { character_id: id }),
    }))
}

/// POST /api/gateway/characters/:id/items
#[utoipa::path(
    post,
    path = "/api/gateway/characters/{id}/items",
    tag = "characters",
    params(("id" = i64, Path, description = "Character id")),
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Item attached (idempotent)"),
        (status = 400, description = "Missing item_id", body = crate::docs::schemas::ErrorBody),
        (status = 404, description = "Unknown character or item", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn add_character_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let id = parse_id(&raw_id, retry_list())?;
    let retry = Link::post("retry", path(&format!("/characters/{}/items", id)));

    let Json(request) = payload.map_err(|e| ApiError::validation(e.body_text(), retry.clone()))?;
    let item_id = request
        .item_id
        .ok_or_else(|| ApiError::validation("item_id is required", retry.clone()))?;

    let message = state
        .rest
        .add_character_item(id, item_id)
        .await
        .map_err(|e| ApiError::from_client(e, "Failed to add item to character", retry))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message,
            source: REST_SOURCE,
            links: view_links(View::Inventory { character_id: id }),
        }),
    ))
}
