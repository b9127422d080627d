//! Dashboard: one view over both backends
//!
//! Both backends are queried concurrently. Each slice independently holds
//! either `{count, list}` or `{error}`, so one failed backend never hides the
//! other's data.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use ashen_common::models::{Character, GuildSummary};
use ashen_common::{Link, Linked};

use super::{REST_SOURCE, SOAP_SOURCE};
use crate::links::{enrich, view_links, Resource, View};
use crate::AppState;

/// Number of entries shown per slice
pub const PREVIEW_LEN: usize = 5;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DashboardSlice<T> {
    Summary { count: usize, list: Vec<T> },
    Unavailable { error: String },
}

impl<T> DashboardSlice<T> {
    /// `count` is the full total; `list` keeps the first [`PREVIEW_LEN`]
    fn summary(mut records: Vec<T>) -> Self {
        let count = records.len();
        records.truncate(PREVIEW_LEN);
        DashboardSlice::Summary {
            count,
            list: records,
        }
    }

    fn unavailable(error: &str) -> Self {
        DashboardSlice::Unavailable {
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub characters: DashboardSlice<Linked<Character>>,
    pub guilds: DashboardSlice<GuildSummary>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub timestamp: String,
    pub data: DashboardData,
    /// Backends that answered, REST first
    pub sources: Vec<&'static str>,
    pub links: Vec<Link>,
}

/// GET /api/gateway/dashboard
#[utoipa::path(
    get,
    path = "/api/gateway/dashboard",
    tag = "dashboard",
    responses((
        status = 200,
        description = "Character and guild summaries; each slice holds `{count, list}` or `{error}`"
    ))
)]
pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let (characters, guilds) =
        tokio::join!(state.rest.list_characters(), state.soap.get_all_guilds());

    let mut sources = Vec::with_capacity(2);

    let characters = match characters {
        Ok(list) => {
            sources.push(REST_SOURCE);
            DashboardSlice::summary(
                list.into_iter()
                    .map(|c| {
                        let id = c.id;
                        enrich(c, Resource::Character { id })
                    })
                    .collect(),
            )
        }
        Err(e) => {
            warn!("Dashboard: REST backend failed: {}", e);
            DashboardSlice::unavailable("REST API unavailable")
        }
    };

    let guilds = match guilds {
        Ok(list) => {
            sources.push(SOAP_SOURCE);
            DashboardSlice::summary(list.iter().map(GuildSummary::from).collect())
        }
        Err(e) => {
            warn!("Dashboard: SOAP backend failed: {}", e);
            DashboardSlice::unavailable("SOAP Service unavailable")
        }
    };

    Json(DashboardResponse {
        timestamp: Utc::now().to_rfc3339(),
        data: DashboardData { characters, guilds },
        sources,
        links: view_links(View::Dashboard),
    })
}
