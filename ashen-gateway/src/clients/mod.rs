//! Backend clients
//!
//! One client per upstream: the JSON REST character service and the SOAP
//! guild service. Both share a single `reqwest::Client` carrying the
//! per-request timeout.

use std::time::Duration;
use thiserror::Error;

use crate::soap::SoapFault;

pub mod rest;
pub mod soap;

pub use rest::RestClient;
pub use soap::{SoapClient, SoapOperation};

const USER_AGENT: &str = concat!("ashen-gateway/", env!("CARGO_PKG_VERSION"));

/// Backend client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, timeout, broken body, ...
    #[error("Transport error: {0}")]
    Transport(String),

    /// The SOAP service answered with a fault
    #[error("SOAP fault: {0}")]
    SoapFault(#[from] SoapFault),

    /// The REST service answered with a non-2xx status
    #[error("Upstream returned status {status}")]
    UpstreamStatus {
        status: u16,
        /// Upstream body, JSON if it parsed, otherwise the raw text
        body: serde_json::Value,
    },

    /// The payload did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// HTTP client shared by both backend clients
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(ClientError::from)
}

fn trim_base_url(url: impl Into<String>) -> String {
    let mut url = url.into();
    while url.ends_with('/') {
        url.pop();
    }
    url
}
