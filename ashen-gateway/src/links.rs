//! Hypermedia enricher
//!
//! Each resource kind has a fixed, ordered set of relations. Nothing here
//! looks at record state: the only variation is between a record that was
//! just created and one that was read back.

use ashen_common::{Link, Linked};

use crate::docs::DOCS_PATH;

/// Mount point of every gateway route
pub const BASE_PATH: &str = "/api/gateway";

/// A single record the gateway returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Character { id: i64 },
    CreatedCharacter { id: i64 },
    Guild { id: i64 },
    CreatedGuild { id: i64 },
    Member { guild_id: i64 },
}

/// A response envelope the gateway returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    Health,
    Characters,
    Character { id: i64 },
    Inventory { character_id: i64 },
    Guilds,
    Guild { id: i64 },
    Members { guild_id: i64 },
    Joined { guild_id: i64 },
    Dashboard,
}

pub fn path(suffix: &str) -> String {
    format!("{}{}", BASE_PATH, suffix)
}

fn character_path(id: i64) -> String {
    path(&format!("/characters/{}", id))
}

fn items_path(id: i64) -> String {
    path(&format!("/characters/{}/items", id))
}

fn guild_path(id: i64) -> String {
    path(&format!("/guilds/{}", id))
}

fn members_path(id: i64) -> String {
    path(&format!("/guilds/{}/members", id))
}

/// Attach the links of `resource` to `record`
pub fn enrich<T>(record: T, resource: Resource) -> Linked<T> {
    Linked::new(record, resource_links(resource))
}

pub fn resource_links(resource: Resource) -> Vec<Link> {
    match resource {
        Resource::Character { id } => vec![
            Link::new("self", character_path(id)),
            Link::new("items", items_path(id)),
            Link::new("guilds", path("/guilds")),
        ],
        Resource::CreatedCharacter { id } => vec![
            Link::new("self", character_path(id)),
            Link::new("items", items_path(id)),
            Link::post("join-guild", path("/guilds/join")),
        ],
        Resource::Guild { id } => vec![
            Link::new("self", guild_path(id)),
            Link::new("members", members_path(id)),
            Link::post("join", path("/guilds/join")),
        ],
        Resource::CreatedGuild { id } => vec![
            Link::new("self", guild_path(id)),
            Link::new("members", members_path(id)),
            Link::new("all-guilds", path("/guilds")),
        ],
        Resource::Member { guild_id } => vec![Link::new("guild", guild_path(guild_id))],
    }
}

pub fn view_links(view: View) -> Vec<Link> {
    match view {
        View::Index => vec![
            Link::new("health", path("/health")),
            Link::new("dashboard", path("/dashboard")),
            Link::new("characters", path("/characters")),
            Link::new("guilds", path("/guilds")),
            Link::new("docs", DOCS_PATH),
        ],
        View::Health => vec![
            Link::new("self", path("/health")),
            Link::new("characters", path("/characters")),
            Link::new("guilds", path("/guilds")),
            Link::new("dashboard", path("/dashboard")),
            Link::new("docs", DOCS_PATH),
        ],
        View::Characters => vec![
            Link::new("self", path("/characters")),
            Link::post("create", path("/characters")),
            Link::new("guilds", path("/guilds")),
        ],
        View::Character { id } => vec![
            Link::new("self", character_path(id)),
            Link::new("items", items_path(id)),
            Link::new("characters", path("/characters")),
        ],
        View::Inventory { character_id } => vec![
            Link::new("self", items_path(character_id)),
            Link::new("character", character_path(character_id)),
            Link::post("add-item", items_path(character_id)),
        ],
        View::Guilds => vec![
            Link::new("self", path("/guilds")),
            Link::post("create", path("/guilds")),
            Link::new("characters", path("/characters")),
        ],
        View::Guild { id } => vec![
            Link::new("self", guild_path(id)),
            Link::new("members", members_path(id)),
            Link::post("join", path("/guilds/join")),
        ],
        View::Members { guild_id } => vec![
            Link::new("self", members_path(guild_id)),
            Link::new("guild", guild_path(guild_id)),
            Link::post("join", path("/guilds/join")),
        ],
        View::Joined { guild_id } => vec![
            Link::new("guild", guild_path(guild_id)),
            Link::new("members", members_path(guild_id)),
        ],
        View::Dashboard => vec![
            Link::new("self", path("/dashboard")),
            Link::new("characters", path("/characters")),
            Link::new("guilds", path("/guilds")),
            Link::new("health", path("/health")),
        ],
    }
}

/// Recovery links for an error response: retry the request, check health
pub fn recovery_links(retry: Link) -> Vec<Link> {
    vec![retry, Link::new("health", path("/health"))]
}
