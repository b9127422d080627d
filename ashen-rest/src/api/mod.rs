//! HTTP API handlers for ashen-rest

pub mod characters;
pub mod health;
pub mod items;

pub use characters::{
    add_character_item, create_character, get_character, list_character_items, list_characters,
};
pub use health::health_routes;
pub use items::{create_item, get_item, list_items};
