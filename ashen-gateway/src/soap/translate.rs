//! SOAP response translation
//!
//! Turns a SOAP response body into typed records. Fault detection runs first
//! and short-circuits; record extraction afterwards is lenient: an element
//! that lacks its identifying fields is dropped, never reported as an error.

use ashen_common::models::{Guild, GuildMember};
use thiserror::Error;

use super::xml::{self, XmlDocument, XmlNode};

/// Used when a fault carries no usable `faultstring`
pub const DEFAULT_FAULT_MESSAGE: &str = "SOAP Fault occurred";

/// Domain classification of a fault string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    GuildNotFound,
    CharacterAlreadyInGuild,
    GuildNameTaken,
    Other,
}

impl FaultKind {
    pub fn classify(message: &str) -> Self {
        let message = message.trim();
        if message.eq_ignore_ascii_case("Guild not found") {
            FaultKind::GuildNotFound
        } else if message.eq_ignore_ascii_case("Character already in guild") {
            FaultKind::CharacterAlreadyInGuild
        } else if message.eq_ignore_ascii_case("Guild name already exists") {
            FaultKind::GuildNameTaken
        } else {
            FaultKind::Other
        }
    }
}

/// A `<soap:Fault>` returned by the guild service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SoapFault {
    /// The fault string, verbatim
    pub message: String,
    pub kind: FaultKind,
}

impl SoapFault {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = FaultKind::classify(&message);
        Self { message, kind }
    }
}

/// Successful `join_guild` outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinConfirmation {
    /// Service-provided message, if any
    pub message: Option<String>,
}

/// Parse a response body, failing only if it carries a fault
pub fn read_response(body: &str) -> Result<XmlDocument, SoapFault> {
    let doc = xml::parse(body);
    match detect_fault(&doc) {
        Some(fault) => Err(fault),
        None => Ok(doc),
    }
}

/// Find a `Fault` element anywhere in the document
pub fn detect_fault(doc: &XmlDocument) -> Option<SoapFault> {
    let fault = doc.find("Fault")?;

    let mut strings = Vec::new();
    fault.find_all("faultstring", &mut strings);
    let message = strings
        .into_iter()
        .map(|n| n.text.trim())
        .find(|t| !t.is_empty())
        .unwrap_or(DEFAULT_FAULT_MESSAGE);

    Some(SoapFault::new(message))
}

/// Every valid `<guild>` record, in document order
pub fn guilds(doc: &XmlDocument) -> Vec<Guild> {
    doc.find_all("guild")
        .into_iter()
        .filter_map(guild_from_node)
        .collect()
}

/// The first valid `<guild>` record
pub fn first_guild(doc: &XmlDocument) -> Option<Guild> {
    doc.find_all("guild").into_iter().find_map(guild_from_node)
}

/// Every valid `<member>` record, in document order
pub fn members(doc: &XmlDocument) -> Vec<GuildMember> {
    doc.find_all("member")
        .into_iter()
        .filter_map(member_from_node)
        .collect()
}

/// Recognize a successful join by its response element
pub fn join_confirmation(doc: &XmlDocument) -> Option<JoinConfirmation> {
    let response = doc.find("join_guildResponse")?;
    let message = response
        .child_text("message")
        .map(str::to_string);
    Some(JoinConfirmation { message })
}

fn guild_from_node(node: &XmlNode) -> Option<Guild> {
    if !node.complete {
        return None;
    }

    let id = int_field(node, "id")?;
    let name = node.child_text("name")?.to_string();

    Some(Guild {
        id,
        name,
        description: node.child_text("description").map(str::to_string),
        leader: node.child_text("leader").map(str::to_string),
        member_count: int_field(node, "member_count").unwrap_or(0),
    })
}

fn member_from_node(node: &XmlNode) -> Option<GuildMember> {
    if !node.complete {
        return None;
    }

    let id = int_field(node, "id")?;
    let character_name = node.child_text("character_name")?.to_string();

    Some(GuildMember {
        id,
        character_name,
        guild_id: int_field(node, "guild_id"),
        rank: node.child_text("rank").map(str::to_string),
        join_date: node.child_text("join_date").map(str::to_string),
    })
}

fn int_field(node: &XmlNode, name: &str) -> Option<i64> {
    node.child_text(name)?.parse().ok()
}
