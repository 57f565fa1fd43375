//! Dropbox connector

use async_trait::async_trait;
use clutterscore_core::{models::ToolSource, OAuthClient};
use reqwest::StatusCode;
use serde_json::json;

use crate::oauth::TokenRefresher;
use crate::traits::{
    api_error, Connector, ConnectorCredentials, ConnectorError, ConnectorResult, FileMetadata,
};

pub const DROPBOX_API_BASE: &str = "https://api.dropboxapi.com";
pub const DROPBOX_TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

pub struct DropboxConnector {
    http: reqwest::Client,
    base_url: String,
    refresher: TokenRefresher,
}

impl DropboxConnector {
    pub fn new(http: reqwest::Client, client: Option<OAuthClient>) -> Self {
        Self::with_endpoints(http, DROPBOX_API_BASE, DROPBOX_TOKEN_URL, client)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        client: Option<OAuthClient>,
    ) -> Self {
        Self {
            refresher: TokenRefresher::new(ToolSource::Dropbox, token_url, client, http.clone()),
            http,
            base_url: base_url.into(),
        }
    }
}

/// Dropbox addresses files by ID through an `id:` prefixed path.
fn dropbox_path(external_id: &str) -> String {
    if external_id.starts_with("id:") {
        external_id.to_string()
    } else {
        format!("id:{}", external_id)
    }
}

#[async_trait]
impl Connector for DropboxConnector {
    fn source(&self) -> ToolSource {
        ToolSource::Dropbox
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
            .post(format!("{}/2/files/delete_v2", self.base_url))
            .bearer_auth(&credentials.access_token)
            .json(&json!({ "path": dropbox_path(external_id) }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Endpoint errors come back as 409 with a machine readable summary.
        if status == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            if body.contains("not_found") {
                tracing::info!(
                    external_id = %external_id,
                    file_name = %metadata.name,
                    "File already absent from Dropbox"
                );
                return Ok(());
            }
            return Err(ConnectorError::Api {
                platform: ToolSource::Dropbox,
                message: format!("{} - {}", status, body),
            });
        }

        Err(api_error(ToolSource::Dropbox, response).await)
    }
}
