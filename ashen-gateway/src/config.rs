//! ashen-gateway specific configuration

use std::time::Duration;

use ashen_common::config::{
    resolve_setting, TomlConfig, DEFAULT_GATEWAY_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_REST_URL, DEFAULT_SOAP_URL,
};

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct GatewayOverrides {
    pub port: Option<u16>,
    pub rest_url: Option<String>,
    pub soap_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Resolved gateway configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub port: u16,
    /// Base URL of the REST character service
    pub rest_url: String,
    /// Base URL of the SOAP guild service (endpoint is `{soap_url}/soap`)
    pub soap_url: String,
    /// Applied to every backend call
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// Merge overrides, TOML values and compiled defaults
    pub fn resolve(overrides: GatewayOverrides, toml: &TomlConfig) -> Self {
        let section = &toml.gateway;
        Self {
            port: resolve_setting(overrides.port, section.port, DEFAULT_GATEWAY_PORT),
            rest_url: resolve_setting(
                overrides.rest_url,
                section.rest_url.clone(),
                DEFAULT_REST_URL.to_string(),
            ),
            soap_url: resolve_setting(
                overrides.soap_url,
                section.soap_url.clone(),
                DEFAULT_SOAP_URL.to_string(),
            ),
            request_timeout: Duration::from_secs(resolve_setting(
                overrides.request_timeout_secs,
                section.request_timeout_secs,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
        }
    }
}
