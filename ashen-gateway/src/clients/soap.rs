//! SOAP guild service client
//!
//! Wraps an operation fragment in an envelope, POSTs it to `{base}/soap` and
//! hands the body to the translator. Faults arrive with HTTP 500, so every
//! status is accepted and only a fault element in the body counts as an error.

use ashen_common::models::{Guild, GuildMember};
use quick_xml::escape::escape;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use super::{trim_base_url, ClientError};
use crate::soap::translate::{self, JoinConfirmation};
use crate::soap::xml::XmlDocument;

/// Operation namespace of the guild service
pub const GUILD_NAMESPACE: &str = "http://ashennetwork.soap/guild";
const ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Operations offered by the guild service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapOperation {
    GetAllGuilds,
    GetGuildById,
    CreateGuild,
    JoinGuild,
    GetGuildMembers,
}

impl SoapOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoapOperation::GetAllGuilds => "get_all_guilds",
            SoapOperation::GetGuildById => "get_guild_by_id",
            SoapOperation::CreateGuild => "create_guild",
            SoapOperation::JoinGuild => "join_guild",
            SoapOperation::GetGuildMembers => "get_guild_members",
        }
    }

    pub fn soap_action(&self) -> String {
        format!("{}/{}", GUILD_NAMESPACE, self.as_str())
    }
}

/// Build the request envelope around an operation's parameter fragment
pub fn envelope(operation: SoapOperation, fragment: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="{env}" xmlns:tns="{ns}">
    <soap:Body>
        <tns:{op}>{fragment}</tns:{op}>
    </soap:Body>
</soap:Envelope>"#,
        env = ENVELOPE_NAMESPACE,
        ns = GUILD_NAMESPACE,
        op = operation.as_str(),
        fragment = fragment,
    )
}

/// One escaped parameter element
pub fn param(name: &str, value: &str) -> String {
    format!("<{name}>{}</{name}>", escape(value), name = name)
}

#[derive(Debug, Clone)]
pub struct SoapClient {
    http: reqwest::Client,
    base_url: String,
}

impl SoapClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: trim_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke an operation and return the parsed, fault-free response
    pub async fn call(
        &self,
        operation: SoapOperation,
        fragment: &str,
    ) -> Result<XmlDocument, ClientError> {
        let url = format!("{}/soap", self.base_url);
        debug!(operation = operation.as_str(), url = %url, "SOAP call");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", operation.soap_action())
            .body(envelope(operation, fragment))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let doc = translate::read_response(&body).map_err(|fault| {
            debug!(operation = operation.as_str(), fault = %fault.message, "SOAP fault");
            ClientError::SoapFault(fault)
        })?;

        if !status.is_success() {
            warn!(
                operation = operation.as_str(),
                status = status.as_u16(),
                "SOAP service returned non-success status without a fault"
            );
        }

        Ok(doc)
    }

    /// Reachability check: the service publishes its WSDL at `/?wsdl`
    pub async fn probe(&self) -> bool {
        match self.http.get(format!("{}/?wsdl", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("SOAP probe failed: {}", e);
                false
            }
        }
    }

    pub async fn get_all_guilds(&self) -> Result<Vec<Guild>, ClientError> {
        let doc = self.call(SoapOperation::GetAllGuilds, "").await?;
        Ok(translate::guilds(&doc))
    }

    /// `None` when the response holds no valid guild
    pub async fn get_guild(&self, guild_id: i64) -> Result<Option<Guild>, ClientError> {
        let fragment = param("guild_id", &guild_id.to_string());
        let doc = self.call(SoapOperation::GetGuildById, &fragment).await?;
        Ok(translate::first_guild(&doc))
    }

    /// `None` when the service answered without a guild record
    pub async fn create_guild(
        &self,
        name: &str,
        description: &str,
        leader: &str,
    ) -> Result<Option<Guild>, ClientError> {
        let fragment = [
            param("name", name),
            param("description", description),
            param("leader", leader),
        ]
        .concat();
        let doc = self.call(SoapOperation::CreateGuild, &fragment).await?;
        Ok(translate::first_guild(&doc))
    }

    pub async fn join_guild(
        &self,
        guild_id: i64,
        character_name: &str,
    ) -> Result<JoinConfirmation, ClientError> {
        let fragment = [
            param("guild_id", &guild_id.to_string()),
            param("character_name", character_name),
        ]
        .concat();
        let doc = self.call(SoapOperation::JoinGuild, &fragment).await?;
        translate::join_confirmation(&doc).ok_or_else(|| {
            ClientError::Decode("join_guild response carried no confirmation".to_string())
        })
    }

    pub async fn guild_members(&self, guild_id: i64) -> Result<Vec<GuildMember>, ClientError> {
        let fragment = param("guild_id", &guild_id.to_string());
        let doc = self.call(SoapOperation::GetGuildMembers, &fragment).await?;
        Ok(translate::members(&doc))
    }
}
