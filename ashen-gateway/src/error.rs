//! Error types for ashen-gateway
//!
//! Backend failures never leave a handler as raw client errors: they are
//! translated into one of the variants below, each with a fixed status and a
//! JSON body of the form `{error, message?, details?, links}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use ashen_common::Link;

use crate::clients::ClientError;
use crate::links::{path, recovery_links};
use crate::soap::FaultKind;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid request fields, rejected before any backend call (400)
    #[error("{error}")]
    Validation { error: String, links: Vec<Link> },

    /// Backend failed its reachability probe (503)
    #[error("{service} service unavailable")]
    BackendUnavailable { service: &'static str, hint: String },

    /// Domain-level rejection from a backend (400)
    #[error("{error}")]
    BackendFault {
        error: String,
        message: Option<String>,
        details: Option<Value>,
        links: Vec<Link>,
    },

    /// Lookup by id missed (404)
    #[error("{error}")]
    NotFound {
        error: String,
        message: Option<String>,
        details: Option<Value>,
        links: Vec<Link>,
    },

    /// Network, protocol or decoding failure (500)
    #[error("{error}: {details}")]
    Transport {
        error: String,
        details: String,
        links: Vec<Link>,
    },
}

/// Wire form of every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    links: Vec<Link>,
}

impl ApiError {
    pub fn validation(error: impl Into<String>, retry: Link) -> Self {
        ApiError::Validation {
            error: error.into(),
            links: vec![retry],
        }
    }

    pub fn soap_unavailable(base_url: &str) -> Self {
        ApiError::BackendUnavailable {
            service: "SOAP",
            hint: format!("Please ensure the SOAP service is running at {}", base_url),
        }
    }

    pub fn not_found(error: impl Into<String>, links: Vec<Link>) -> Self {
        ApiError::NotFound {
            error: error.into(),
            message: None,
            details: None,
            links,
        }
    }

    /// Translate a backend client error
    ///
    /// `error` is the summary used when the failure has no more specific
    /// wording; `retry` is the link offered for retrying the operation.
    pub fn from_client(err: ClientError, error: &str, retry: Link) -> Self {
        match err {
            ClientError::SoapFault(fault) => match fault.kind {
                FaultKind::GuildNotFound => ApiError::NotFound {
                    error: "Guild not found".to_string(),
                    message: Some(fault.message),
                    details: None,
                    links: vec![Link::new("all-guilds", path("/guilds"))],
                },
                FaultKind::CharacterAlreadyInGuild => ApiError::BackendFault {
                    error: "Character already in guild".to_string(),
                    message: Some(fault.message),
                    details: None,
                    links: vec![retry],
                },
                FaultKind::GuildNameTaken => ApiError::BackendFault {
                    error: error.to_string(),
                    message: None,
                    details: Some(Value::String(fault.message)),
                    links: vec![retry],
                },
                FaultKind::Other => ApiError::Transport {
                    error: error.to_string(),
                    details: fault.message,
                    links: recovery_links(retry),
                },
            },
            ClientError::UpstreamStatus { status: 404, body } => ApiError::NotFound {
                error: error.to_string(),
                message: None,
                details: Some(body),
                links: recovery_links(retry),
            },
            ClientError::UpstreamStatus { status, body } if (400..500).contains(&status) => {
                ApiError::BackendFault {
                    error: error.to_string(),
                    message: None,
                    details: Some(body),
                    links: vec![retry],
                }
            }
            ClientError::UpstreamStatus { status, body } => ApiError::Transport {
                error: error.to_string(),
                details: format!("upstream status {}: {}", status, body),
                links: recovery_links(retry),
            },
            ClientError::Transport(details) | ClientError::Decode(details) => {
                ApiError::Transport {
                    error: error.to_string(),
                    details,
                    links: recovery_links(retry),
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BackendFault { .. } => StatusCode::BAD_REQUEST,
            ApiError::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorBody {
        match self {
            ApiError::Validation { error, links } => ErrorBody {
                error,
                message: None,
                details: None,
                links,
            },
            ApiError::BackendUnavailable { service, hint } => ErrorBody {
                error: format!("{} service unavailable", service),
                message: Some(hint),
                details: None,
                links: vec![Link::new("retry", path("/health"))],
            },
            ApiError::BackendFault {
                error,
                message,
                details,
                links,
            }
            | ApiError::NotFound {
                error,
                message,
                details,
                links,
            } => ErrorBody {
                error,
                message,
                details,
                links,
            },
            ApiError::Transport {
                error,
                details,
                links,
            } => ErrorBody {
                error,
                message: None,
                details: Some(Value::String(details)),
                links,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }
        (status, Json(self.into_body())).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::SoapFault;
    use serde_json::json;

    fn retry() -> Link {
        Link::new("retry", path("/guilds"))
    }

    fn body_of(err: ApiError) -> Value {
        serde_json::to_value(err.into_body()).unwrap()
    }

    #[test]
    fn test_guild_not_found_fault_is_404() {
        let err = ApiError::from_client(
            ClientError::SoapFault(SoapFault::new("Guild not found")),
            "Failed to join guild",
            retry(),
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(err)["error"], "Guild not found");
    }

    #[test]
    fn test_duplicate_member_fault_is_400() {
        let err = ApiError::from_client(
            ClientError::SoapFault(SoapFault::new("Character already in guild")),
            "Failed to join guild",
            retry(),
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(err)["error"], "Character already in guild");
    }

    #[test]
    fn test_unknown_fault_is_500_with_details() {
        let err = ApiError::from_client(
            ClientError::SoapFault(SoapFault::new("database is locked")),
            "Failed to fetch guilds",
            retry(),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(err);
        assert_eq!(body["details"], "database is locked");
        assert_eq!(body["links"][1]["rel"], "health");
    }

    #[test]
    fn test_upstream_validation_echoes_body() {
        let err = ApiError::from_client(
            ClientError::UpstreamStatus {
                status: 400,
                body: json!({"error": "level must be between 1 and 99, got 120"}),
            },
            "Failed to create character",
            retry(),
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(err)["details"]["error"],
            "level must be between 1 and 99, got 120"
        );
    }

    #[test]
    fn test_transport_is_500() {
        let err = ApiError::from_client(
            ClientError::Transport("connection refused".to_string()),
            "Failed to fetch characters",
            retry(),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unavailable_body() {
        let err = ApiError::soap_unavailable("http://localhost:8000");
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_of(err);
        assert_eq!(body["error"], "SOAP service unavailable");
        assert_eq!(body["links"][0]["href"], "/api/gateway/health");
    }
}
