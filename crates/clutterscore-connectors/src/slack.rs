//! Slack connector

use async_trait::async_trait;
use clutterscore_core::{models::ToolSource, OAuthClient};
use serde::Deserialize;

use crate::oauth::TokenRefresher;
use crate::traits::{
    api_error, Connector, ConnectorCredentials, ConnectorError, ConnectorResult, FileMetadata,
};

pub const SLACK_API_BASE: &str = "https://slack.com/api";
pub const SLACK_TOKEN_URL: &str = "https://slack.com/api/oauth.v2.access";

/// Slack error codes meaning the file no longer exists.
const ALREADY_GONE: [&str; 2] = ["file_not_found", "file_deleted"];

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackConnector {
    http: reqwest::Client,
    base_url: String,
    refresher: TokenRefresher,
}

impl SlackConnector {
    pub fn new(http: reqwest::Client, client: Option<OAuthClient>) -> Self {
        Self::with_endpoints(http, SLACK_API_BASE, SLACK_TOKEN_URL, client)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        client: Option<OAuthClient>,
    ) -> Self {
        Self {
            refresher: TokenRefresher::new(ToolSource::Slack, token_url, client, http.clone()),
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Connector for SlackConnector {
    fn source(&self) -> ToolSource {
        ToolSource::Slack
    }

    async fn refresh_credentials(&self, credentials: &mut ConnectorCredentials) -> ConnectorResult<()> {
        self.refresher.refresh(credentials).await
    }

    async fn delete_file(
        &self,
        credentials: &mut ConnectorCredentials,
        external_id: &str,
        metadata: &FileMetadata,
    ) -> ConnectorResult<()> {
        self.refresher.ensure_fresh(credentials).await?;

        let response = self
            .http
            .post(format!("{}/files.delete", self.base_url))
            .bearer_auth(&credentials.access_token)
            .form(&[("file", external_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(ToolSource::Slack, response).await);
        }

        // Slack reports failures with HTTP 200 and `ok: false`.
        let body: SlackResponse = response.json().await?;
        if body.ok {
            return Ok(());
        }

        let code = body.error.unwrap_or_else(|| "unknown_error".to_string());
        if ALREADY_GONE.contains(&code.as_str()) {
            tracing::info!(
                external_id = %external_id,
                file_name = %metadata.name,
                "File already absent from Slack"
            );
            return Ok(());
        }

        Err(ConnectorError::Api {
            platform: ToolSource::Slack,
            message: code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ConnectorCredentials {
        ConnectorCredentials {
            access_token: "xoxp-token".to_string(),
            refresh_token: None,
            expires_at: None,
            tenant_id: "t1".to_string(),
        }
    }

    fn metadata() -> FileMetadata {
        FileMetadata {
            name: "a.pdf".to_string(),
            path: None,
            mime_type: Some("application/pdf".to_string()),
        }
    }

    async fn connector_responding(body: &str) -> (mockito::ServerGuard, mockito::Mock, SlackConnector) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/files.delete")
            .match_header("authorization", "Bearer xoxp-token")
            .match_body(mockito::Matcher::UrlEncoded("file".into(), "ext-1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        let connector = SlackConnector::with_endpoints(reqwest::Client::new(), server.url(), "", None);
        (server, mock, connector)
    }

    #[tokio::test]
    async fn test_delete_ok() {
        let (_server, mock, connector) = connector_responding(r#"{"ok":true}"#).await;
        connector
            .delete_file(&mut credentials(), "ext-1", &metadata())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_already_deleted_file_is_success() {
        let (_server, _mock, connector) =
            connector_responding(r#"{"ok":false,"error":"file_deleted"}"#).await;
        assert!(connector
            .delete_file(&mut credentials(), "ext-1", &metadata())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_error_code_is_reported() {
        let (_server, _mock, connector) =
            connector_responding(r#"{"ok":false,"error":"cant_delete_file"}"#).await;
        let err = connector
            .delete_file(&mut credentials(), "ext-1", &metadata())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "SLACK API error: cant_delete_file");
    }
}
