//! Item endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use ashen_common::models::{Item, NewItem};
use ashen_common::{Link, Linked};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

fn item_links(id: i64) -> Vec<Link> {
    vec![Link::new("self", format!("/api/items/{}", id))]
}

/// GET /api/items
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "items",
    responses((status = 200, description = "All items", body = [crate::docs::schemas::Item]))
)]
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Linked<Item>>>> {
    let items = db::items::list_items(&state.db).await?;

    Ok(Json(
        items
            .into_iter()
            .map(|i| {
                let links = item_links(i.id);
                Linked::new(i, links)
            })
            .collect(),
    ))
}

/// GET /api/items/:id
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = crate::docs::schemas::Item),
        (status = 404, description = "No such item", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Linked<Item>>> {
    let item = db::items::get_item(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(Linked::new(item, item_links(id))))
}

/// POST /api/items
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = crate::docs::schemas::Item),
        (status = 400, description = "Missing name or type", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Linked<Item>>)> {
    let Json(request) = payload?;

    let new = match (request.name, request.item_type) {
        (Some(name), Some(item_type)) if !name.trim().is_empty() && !item_type.trim().is_empty() => {
            NewItem { name, item_type }
        }
        _ => return Err(ApiError::BadRequest("name and type are required".to_string())),
    };

    let created = db::items::insert_item(&state.db, &new).await?;
    let links = item_links(created.id);
    Ok((StatusCode::CREATED, Json(Linked::new(created, links))))
}
