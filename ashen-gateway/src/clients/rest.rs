//! REST character service client

use ashen_common::models::{Character, CharacterItems, NewCharacter};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use super::{trim_base_url, ClientError};

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: trim_base_url(base_url),
        }
    }

    /// Issue one call and return the JSON payload
    ///
    /// Non-2xx answers become [`ClientError::UpstreamStatus`] carrying the
    /// upstream body so handlers can echo it.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, "REST call");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let payload = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if !status.is_success() {
            debug!(status = status.as_u16(), body = %payload, "REST call rejected");
            return Err(ClientError::UpstreamStatus {
                status: status.as_u16(),
                body: payload,
            });
        }

        Ok(payload)
    }

    async fn call_typed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let payload = self.call(method, path, body).await?;
        serde_json::from_value(payload).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Lightweight reachability check
    pub async fn probe(&self) -> bool {
        self.call(Method::GET, "/api/characters", None).await.is_ok()
    }

    pub async fn list_characters(&self) -> Result<Vec<Character>, ClientError> {
        self.call_typed(Method::GET, "/api/characters", None).await
    }

    pub async fn get_character(&self, id: i64) -> Result<Character, ClientError> {
        self.call_typed(Method::GET, &format!("/api/characters/{}", id), None)
            .await
    }

    pub async fn create_character(&self, new: &NewCharacter) -> Result<Character, ClientError> {
        let body = serde_json::to_value(new).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.call_typed(Method::POST, "/api/characters", Some(&body))
            .await
    }

    pub async fn character_items(&self, id: i64) -> Result<CharacterItems, ClientError> {
        self.call_typed(Method::GET, &format!("/api/characters/{}/items", id), None)
            .await
    }

    /// Attach an item; returns the service's confirmation message
    pub async fn add_character_item(&self, id: i64, item_id: i64) -> Result<String, ClientError> {
        let payload = self
            .call(
                Method::POST,
                &format!("/api/characters/{}/items", id),
                Some(&json!({ "item_id": item_id })),
            )
            .await?;

        payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::Decode("missing message in add-item response".to_string()))
    }
}
