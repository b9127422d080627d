//! Hypermedia links (HATEOAS)
//!
//! Every record and collection returned by an Ashen Network service carries a
//! `links` array advertising the operations a client may perform next.
//! Links are computed per response and never persisted.

use serde::{Deserialize, Serialize};

/// A single relation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation name (e.g. "self", "members", "join-guild")
    pub rel: String,
    /// Target path, absolute from the server root
    pub href: String,
    /// HTTP method, omitted for plain GET navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl Link {
    /// GET navigation link
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            method: None,
        }
    }

    /// Link to a state-changing operation
    pub fn post(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            method: Some("POST".to_string()),
        }
    }
}

/// A record with its links flattened alongside the record's own fields
///
/// Serializes as `{...record fields, "links": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub data: T,
    pub links: Vec<Link>,
}

impl<T> Linked<T> {
    pub fn new(data: T, links: Vec<Link>) -> Self {
        Self { data, links }
    }
}
