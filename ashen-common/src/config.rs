//! Configuration loading
//!
//! Every setting is resolved in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Services parse 1 and 2 with clap (`#[arg(env = ...)]`), so by the time a
//! value reaches [`resolve_setting`] both arrive as a single `Option`.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Compiled defaults
pub const DEFAULT_GATEWAY_PORT: u16 = 4000;
pub const DEFAULT_REST_PORT: u16 = 3001;
pub const DEFAULT_REST_URL: &str = "http://localhost:3001";
pub const DEFAULT_SOAP_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATABASE_PATH: &str = "data/dark_souls.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`; every field is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub gateway: GatewaySection,
    pub rest: RestSection,
    pub logging: LoggingConfig,
}

/// `[gateway]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewaySection {
    pub port: Option<u16>,
    pub rest_url: Option<String>,
    pub soap_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// `[rest]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RestSection {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Where a loaded [`TomlConfig`] came from
///
/// Loading runs before tracing is initialised (the file may set the log
/// level), so callers log this once the subscriber is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("compiled defaults (no config file)"),
        }
    }
}

/// Pick the highest-priority value that is present
pub fn resolve_setting<T>(cli_or_env: Option<T>, toml: Option<T>, default: T) -> T {
    cli_or_env.or(toml).unwrap_or(default)
}

/// Platform config file location: `<config dir>/ashen/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ashen").join("config.toml"))
}

/// Load the TOML config
///
/// An explicitly requested file must exist. When no file is requested, the
/// platform default location is tried and a missing file just means "use
/// compiled defaults".
pub fn load_toml_config(explicit: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok((TomlConfig::default(), ConfigSource::Defaults)),
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = parse_toml_config(&content).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    Ok((config, ConfigSource::File(path)))
}

/// Parse config file contents
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    Ok(toml::from_str(content)?)
}
