//! Google Drive connector

use async_trait::async_trait;
use clutterscore_core::{models::ToolSource, OAuthClient};
use reqwest::StatusCode;

use crate::oauth::TokenRefresher;
use crate::traits::{api_error, Connector, ConnectorCredentials, ConnectorResult, FileMetadata};

pub const GOOGLE_API_BASE: &str = "https://www.googleapis.com";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub struct GoogleDriveConnector {
    http: reqwest::Client,
    base_url: String,
    refresher: TokenRefresher,
}

impl GoogleDriveConnector {
    pub fn new(http: reqwest::Client, client: Option<OAuthClient>) -> Self {
        Self::with_endpoints(http, GOOGLE_API_BASE, GOOGLE_TOKEN_URL, client)
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        client: Option<OAuthClient>,
    ) -> Self {
        Self {
            refresher: TokenRefresher::new(ToolSource::Google, token_url, client, http.clone()),
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Connector for GoogleDriveConnector {
    fn source(&self) -> ToolSource {
        ToolSource::Google
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
            "{}/drive/v3/files/{}?supportsAllDrives=true",
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
                    "File already absent from Google Drive"
                );
                Ok(())
            }
            _ => Err(api_error(ToolSource::Google, response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectorError;

    fn credentials() -> ConnectorCredentials {
        ConnectorCredentials {
            access_token: "google-token".to_string(),
            refresh_token: None,
            expires_at: None,
            tenant_id: "t1".to_string(),
        }
    }

    fn metadata() -> FileMetadata {
        FileMetadata {
            name: "budget.xlsx".to_string(),
            path: Some("/Finance/budget.xlsx".to_string()),
            mime_type: None,
        }
    }

    #[tokio::test]
    async fn test_delete_sends_authorized_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/drive/v3/files/abc123")
            .match_query(mockito::Matcher::UrlEncoded(
                "supportsAllDrives".into(),
                "true".into(),
            ))
            .match_header("authorization", "Bearer google-token")
            .with_status(204)
            .create_async()
            .await;

        let connector =
            GoogleDriveConnector::with_endpoints(reqwest::Client::new(), server.url(), "", None);
        connector
            .delete_file(&mut credentials(), "abc123", &metadata())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_remote_file_counts_as_deleted() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/drive/v3/files/gone")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let connector =
            GoogleDriveConnector::with_endpoints(reqwest::Client::new(), server.url(), "", None);
        assert!(connector
            .delete_file(&mut credentials(), "gone", &metadata())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_forbidden_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/drive/v3/files/locked")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body("insufficientFilePermissions")
            .create_async()
            .await;

        let connector =
            GoogleDriveConnector::with_endpoints(reqwest::Client::new(), server.url(), "", None);
        let err = connector
            .delete_file(&mut credentials(), "locked", &metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Api { platform: ToolSource::Google, .. }));
        assert!(err.to_string().contains("insufficientFilePermissions"));
        assert!(!err.is_unsupported());
    }
}
