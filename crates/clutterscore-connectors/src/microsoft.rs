//! Microsoft OneDrive connector (Graph API)

use async_trait::async_trait;
use clutterscore_core::{models::ToolSource, OAuthClient};
use reqwest::StatusCode;

use crate::oauth::TokenRefresher;
use crate::traits::{api_error, Connector, ConnectorCredentials, ConnectorResult, FileMetadata};

pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";
pub const MICROSOFT_TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";

pub struct MicrosoftConnector {
    http: reqwest::Client,
    base_url: String,
    refresher: TokenRefresher,
}

impl MicrosoftConnector {
    pub fn new(http: reqwest::Client, client: Option<OAuthClient>) -> Self {
        Self::with_endpoints(http, GRAPH_API_BASE, MICROSOFT_TOKEN_URL, client)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        client: Option<OAuthClient>,
    ) -> Self {
        Self {
            refresher: TokenRefresher::new(ToolSource::Microsoft, token_url, client, http.clone()),
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Connector for MicrosoftConnector {
    fn source(&self) -> ToolSource {
        ToolSource::Microsoft
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

        let url = format!(
            "{}/me/drive/items/{}",
            self.base_url,
            urlencoding::encode(external_id)
        );
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&credentials.access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::info!(
                    external_id = %external_id,
                    file_name = %metadata.name,
                    "File already absent from OneDrive"
                );
                Ok(())
            }
            _ => Err(api_error(ToolSource::Microsoft, response).await),
        }
    }
}
