//! Guild endpoints, proxied to the SOAP service
//!
//! Every handler probes the SOAP service first and answers 503 when it is
//! unreachable, before building any request envelope.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use utoipa::ToSchema;

use ashen_common::models::{Guild, GuildMember};
use ashen_common::{Link, Linked};

use super::{parse_id, MessageResponse, SourcedResponse, SOAP_SOURCE};
use crate::clients::ClientError;
use crate::error::{ApiError, ApiResult};
use crate::links::{enrich, path, view_links, Resource, View};
use crate::soap::FaultKind;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListGuildsQuery {
    /// `members` embeds each guild's member list
    pub include: Option<String>,
}

impl ListGuildsQuery {
    fn wants_members(&self) -> bool {
        self.include
            .as_deref()
            .map(|v| v.split(',').any(|part| part.trim() == "members"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGuildRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub leader: Option<String>,
}

/// `guild_id` is accepted as a number or a numeric string
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinGuildRequest {
    #[schema(value_type = Option<i64>)]
    pub guild_id: Option<Value>,
    pub character_name: Option<String>,
}

/// A guild in the listing, optionally with its members
///
/// A member fetch that failed leaves `members` out and sets
/// `members_error`; the rest of the listing is unaffected.
#[derive(Debug, Serialize)]
pub struct GuildEntry {
    #[serde(flatten)]
    pub guild: Guild,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Linked<GuildMember>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members_error: Option<String>,
}

impl GuildEntry {
    fn plain(guild: Guild) -> Self {
        Self {
            guild,
            members: None,
            members_error: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn guild_id_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn enrich_members(members: Vec<GuildMember>, guild_id: i64) -> Vec<Linked<GuildMember>> {
    members
        .into_iter()
        .map(|m| enrich(m, Resource::Member { guild_id }))
        .collect()
}

fn retry_list() -> Link {
    Link::new("retry", path("/guilds"))
}

async fn ensure_soap(state: &AppState) -> ApiResult<()> {
    if state.soap.probe().await {
        Ok(())
    } else {
        warn!(url = state.soap.base_url(), "SOAP service unreachable");
        Err(ApiError::soap_unavailable(state.soap.base_url()))
    }
}

/// GET /api/gateway/guilds[?include=members]
#[utoipa::path(
    get,
    path = "/api/gateway/guilds",
    tag = "guilds",
    params(("include" = Option<String>, Query, description = "`members` embeds each guild's members")),
    responses(
        (status = 200, description = "All guilds", body = [crate::docs::schemas::Guild]),
        (status = 503, description = "SOAP service unreachable", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn list_guilds(
    State(state): State<AppState>,
    Query(query): Query<ListGuildsQuery>,
) -> ApiResult<Json<SourcedResponse<Vec<Linked<GuildEntry>>>>> {
    ensure_soap(&state).await?;

    let guilds = state.soap.get_all_guilds().await.map_err(|e| {
        ApiError::from_client(e, "Failed to fetch guilds from SOAP service", retry_list())
    })?;

    let entries: Vec<GuildEntry> = if query.wants_members() {
        // All member fetches run concurrently; the response waits for every one.
        let fetches = guilds.iter().map(|g| state.soap.guild_members(g.id));
        let results = join_all(fetches).await;

        guilds
            .into_iter()
            .zip(results)
            .map(|(guild, result)| match result {
                Ok(members) => {
                    let members = enrich_members(members, guild.id);
                    GuildEntry {
                        members: Some(members),
                        ..GuildEntry::plain(guild)
                    }
                }
                Err(e) => {
                    warn!(guild_id = guild.id, "Member fetch failed: {}", e);
                    GuildEntry {
                        members_error: Some(e.to_string()),
                        ..GuildEntry::plain(guild)
                    }
                }
            })
            .collect()
    } else {
        guilds.into_iter().map(GuildEntry::plain).collect()
    };

    Ok(Json(SourcedResponse {
        data: entries
            .into_iter()
            .map(|entry| {
                let id = entry.guild.id;
                enrich(entry, Resource::Guild { id })
            })
            .collect(),
        source: SOAP_SOURCE,
        links: view_links(View::Guilds),
    }))
}

/// GET /api/gateway/guilds/:id
#[utoipa::path(
    get,
    path = "/api/gateway/guilds/{id}",
    tag = "guilds",
    params(("id" = i64, Path, description = "Guild id")),
    responses(
        (status = 200, description = "The guild", body = crate::docs::schemas::Guild),
        (status = 404, description = "No such guild", body = crate::docs::schemas::ErrorBody),
        (status = 503, description = "SOAP service unreachable", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn get_guild(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SourcedResponse<Linked<Guild>>>> {
    let id = parse_id(&raw_id, retry_list())?;
    ensure_soap(&state).await?;

    let guild = state
        .soap
        .get_guild(id)
        .await
        .map_err(|e| {
            let retry = Link::new("retry", path(&format!("/guilds/{}", id)));
            ApiError::from_client(e, "Failed to fetch guild", retry)
        })?
        .ok_or_else(|| {
            ApiError::not_found(
                "Guild not found",
                vec![Link::new("all-guilds", path("/guilds"))],
            )
        })?;

    Ok(Json(SourcedResponse {
        data: enrich(guild, Resource::Guild { id }),
        source: SOAP_SOURCE,
        links: view_links(View::Guild { id }),
    }))
}

/// POST /api/gateway/guilds
#[utoipa::path(
    post,
    path = "/api/gateway/guilds",
    tag = "guilds",
    request_body = CreateGuildRequest,
    responses(
        (status = 201, description = "Guild created", body = crate::docs::schemas::Guild),
        (status = 400, description = "Missing fields or name already taken", body = crate::docs::schemas::ErrorBody),
        (status = 503, description = "SOAP service unreachable", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn create_guild(
    State(state): State<AppState>,
    payload: Result<Json<CreateGuildRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SourcedResponse<Linked<Guild>>>)> {
    let retry = Link::post("retry", path("/guilds"));
    let Json(request) = payload.map_err(|e| ApiError::validation(e.body_text(), retry.clone()))?;

    let (Some(name), Some(description), Some(leader)) = (
        non_blank(request.name),
        non_blank(request.description),
        non_blank(request.leader),
    ) else {
        return Err(ApiError::validation(
            "Name, description, and leader are required",
            retry,
        ));
    };

    ensure_soap(&state).await?;

    let mut guild = state
        .soap
        .create_guild(&name, &description, &leader)
        .await
        .map_err(|e| ApiError::from_client(e, "Failed to create guild", retry.clone()))?
        .ok_or_else(|| ApiError::BackendFault {
            error: "Guild name already exists or creation failed".to_string(),
            message: None,
            details: None,
            links: vec![retry],
        })?;

    // The service may echo only id and name.
    guild.description.get_or_insert(description);
    guild.leader.get_or_insert(leader);
    info!(id = guild.id, name = %guild.name, "Guild created via gateway");

    let id = guild.id;
    Ok((
        StatusCode::CREATED,
        Json(SourcedResponse {
            data: enrich(guild, Resource::CreatedGuild { id }),
            source: SOAP_SOURCE,
            links: view_links(View::Guilds),
        }),
    ))
}

/// POST /api/gateway/guilds/join
#[utoipa::path(
    post,
    path = "/api/gateway/guilds/join",
    tag = "guilds",
    request_body = JoinGuildRequest,
    responses(
        (status = 200, description = "Character joined"),
        (status = 400, description = "Missing fields or already a member", body = crate::docs::schemas::ErrorBody),
        (status = 404, description = "No such guild", body = crate::docs::schemas::ErrorBody),
        (status = 503, description = "SOAP service unreachable", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn join_guild(
    State(state): State<AppState>,
    payload: Result<Json<JoinGuildRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let retry = Link::post("retry", path("/guilds/join"));
    let Json(request) = payload.map_err(|e| ApiError::validation(e.body_text(), retry.clone()))?;

    let (Some(guild_id), Some(character_name)) = (
        request.guild_id.as_ref().and_then(guild_id_from),
        non_blank(request.character_name),
    ) else {
        return Err(ApiError::validation(
            "guild_id and character_name are required",
            retry,
        ));
    };

    ensure_soap(&state).await?;

    let confirmation = state
        .soap
        .join_guild(guild_id, &character_name)
        .await
        .map_err(|e| match e {
            ClientError::SoapFault(fault) if fault.kind == FaultKind::CharacterAlreadyInGuild => {
                ApiError::BackendFault {
                    error: fault.message,
                    message: Some(format!(
                        "{} is already a member of guild {}",
                        character_name, guild_id
                    )),
                    details: None,
                    links: vec![
                        Link::new("members", path(&format!("/guilds/{}/members", guild_id))),
                        Link::new("guilds", path("/guilds")),
                    ],
                }
            }
            other => ApiError::from_client(other, "Failed to join guild", retry),
        })?;

    info!(guild_id, character = %character_name, "Character joined guild");

    Ok(Json(MessageResponse {
        message: confirmation
            .message
            .unwrap_or_else(|| format!("{} joined guild successfully", character_name)),
        source: SOAP_SOURCE,
        links: view_links(View::Joined { guild_id }),
    }))
}

/// GET /api/gateway/guilds/:id/members
#[utoipa::path(
    get,
    path = "/api/gateway/guilds/{id}/members",
    tag = "guilds",
    params(("id" = i64, Path, description = "Guild id")),
    responses(
        (status = 200, description = "Members of the guild", body = [crate::docs::schemas::GuildMember]),
        (status = 503, description = "SOAP service unreachable", body = crate::docs::schemas::ErrorBody)
    )
)]
pub async fn guild_members(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SourcedResponse<Vec<Linked<GuildMember>>>>> {
    let id = parse_id(&raw_id, retry_list())?;
    ensure_soap(&state).await?;

    let members = state.soap.guild_members(id).await.map_err(|e| {
        ApiError::from_client(
            e,
            "Failed to fetch guild members",
            Link::new("retry", path(&format!("/guilds/{}/members", id))),
        )
    })?;

    Ok(Json(SourcedResponse {
        data: enrich_members(members, id),
        source: SOAP_SOURCE,
        links: view_links(View::Members { guild_id: id }),
    }))
}
