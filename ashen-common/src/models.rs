//! Domain records shared by the gateway and the REST service
//!
//! Characters and items are owned by the REST service; guilds and guild
//! memberships are owned by the SOAP guild service. The gateway only reshapes
//! them.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid character levels
pub const LEVEL_RANGE: RangeInclusive<i64> = 1..=99;

/// A player character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub level: i64,
}

/// Body of a character creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    pub level: i64,
}

impl NewCharacter {
    /// Check the record-level invariants (non-empty name, level in range)
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if !LEVEL_RANGE.contains(&self.level) {
            return Err(format!(
                "level must be between {} and {}, got {}",
                LEVEL_RANGE.start(),
                LEVEL_RANGE.end(),
                self.level
            ));
        }
        Ok(())
    }
}

/// An item that characters can carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

/// Body of an item creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

/// A character's inventory as returned by `GET /api/characters/{id}/items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterItems {
    /// Character name
    pub character: String,
    pub items: Vec<Item>,
}

/// A guild as reported by the SOAP guild service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
    #[serde(default)]
    pub member_count: i64,
}

/// Short guild form used by the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSummary {
    pub id: i64,
    pub name: String,
}

impl From<&Guild> for GuildSummary {
    fn from(guild: &Guild) -> Self {
        Self {
            id: guild.id,
            name: guild.name.clone(),
        }
    }
}

/// A character's membership in one guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMember {
    pub id: i64,
    pub character_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}
