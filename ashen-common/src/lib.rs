//! # Ashen Network Common Library
//!
//! Shared code for the Ashen Network services:
//! - Domain records (characters, items, guilds, guild members)
//! - Hypermedia link types attached to every API response
//! - Configuration loading (TOML file + compiled defaults)
//! - Common error type

pub mod config;
pub mod error;
pub mod links;
pub mod models;

pub use error::{Error, Result};
pub use links::{Link, Linked};
