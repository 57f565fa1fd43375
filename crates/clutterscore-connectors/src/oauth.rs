//! OAuth refresh-token grant shared by the platform connectors

use chrono::{Duration, Utc};
use clutterscore_core::{models::ToolSource, OAuthClient};
use serde::Deserialize;

use crate::traits::{ConnectorCredentials, ConnectorError, ConnectorResult};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    /// Slack wraps every response in `ok`/`error`
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Refreshes a platform's access token through its token endpoint.
#[derive(Clone)]
pub struct TokenRefresher {
    platform: ToolSource,
    token_url: String,
    client: Option<OAuthClient>,
    http: reqwest::Client,
}

impl TokenRefresher {
    pub fn new(
        platform: ToolSource,
        token_url: impl Into<String>,
        client: Option<OAuthClient>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            platform,
            token_url: token_url.into(),
            client,
            http,
        }
    }

    /// Refresh `credentials` in place if the access token is about to expire.
    pub async fn ensure_fresh(&self, credentials: &mut ConnectorCredentials) -> ConnectorResult<()> {
        if !credentials.needs_refresh(Utc::now()) {
            return Ok(());
        }

        match self.refresh(credentials).await {
            Err(ConnectorError::RefreshUnavailable(platform)) => {
                Err(ConnectorError::TokenExpired(platform))
            }
            result => result,
        }
    }

    /// Run the refresh-token grant regardless of the current expiry.
    pub async fn refresh(&self, credentials: &mut ConnectorCredentials) -> ConnectorResult<()> {
        let (Some(refresh_token), Some(client)) =
            (credentials.refresh_token.clone(), self.client.as_ref())
        else {
            return Err(ConnectorError::RefreshUnavailable(self.platform));
        };

        tracing::debug!(
            platform = %self.platform,
            tenant_id = %credentials.tenant_id,
            "Refreshing expired access token"
        );

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", client.client_id.as_str()),
                ("client_secret", client.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ConnectorError::TokenRefresh {
                platform: self.platform,
                message: format!("{} - {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await?;
        if token.ok == Some(false) {
            return Err(ConnectorError::TokenRefresh {
                platform: self.platform,
                message: token.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }
        let access_token = token.access_token.ok_or_else(|| ConnectorError::TokenRefresh {
            platform: self.platform,
            message: "response did not include an access token".to_string(),
        })?;

        credentials.access_token = access_token;
        if let Some(rotated) = token.refresh_token {
            credentials.refresh_token = Some(rotated);
        }
        credentials.expires_at = token
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        OAuthClient {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    fn expired(refresh_token: Option<&str>) -> ConnectorCredentials {
        ConnectorCredentials {
            access_token: "old-token".to_string(),
            refresh_token: refresh_token.map(String::from),
            expires_at: Some(Utc::now() - Duration::minutes(1)),
            tenant_id: "t1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fresh_token_is_left_alone() {
        let refresher = TokenRefresher::new(
            ToolSource::Google,
            "http://127.0.0.1:1/token",
            Some(client()),
            reqwest::Client::new(),
        );
        let mut credentials = expired(Some("refresh"));
        credentials.expires_at = Some(Utc::now() + Duration::hours(1));

        refresher.ensure_fresh(&mut credentials).await.unwrap();
        assert_eq!(credentials.access_token, "old-token");
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token_fails() {
        let refresher = TokenRefresher::new(
            ToolSource::Google,
            "http://127.0.0.1:1/token",
            Some(client()),
            reqwest::Client::new(),
        );
        let mut credentials = expired(None);

        let err = refresher.ensure_fresh(&mut credentials).await.unwrap_err();
        assert!(matches!(err, ConnectorError::TokenExpired(ToolSource::Google)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(mockito::Matcher::UrlEncoded(
                "grant_type".into(),
                "refresh_token".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"new-token","refresh_token":"new-refresh","expires_in":3600}"#)
            .create_async()
            .await;

        let refresher = TokenRefresher::new(
            ToolSource::Google,
            format!("{}/token", server.url()),
            Some(client()),
            reqwest::Client::new(),
        );
        let mut credentials = expired(Some("refresh"));

        refresher.ensure_fresh(&mut credentials).await.unwrap();
        mock.assert_async().await;
        assert_eq!(credentials.access_token, "new-token");
        assert_eq!(credentials.refresh_token.as_deref(), Some("new-refresh"));
        assert!(credentials.expires_at.unwrap() > Utc::now());
    }

    #[tokio::test]
    async fn test_forced_refresh_ignores_expiry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"forced-token","expires_in":600}"#)
            .create_async()
            .await;

        let refresher = TokenRefresher::new(
            ToolSource::Microsoft,
            format!("{}/token", server.url()),
            Some(client()),
            reqwest::Client::new(),
        );
        let mut credentials = expired(Some("refresh"));
        credentials.expires_at = Some(Utc::now() + Duration::hours(1));

        refresher.refresh(&mut credentials).await.unwrap();
        mock.assert_async().await;
        assert_eq!(credentials.access_token, "forced-token");
        assert_eq!(credentials.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_forced_refresh_without_client_is_unavailable() {
        let refresher = TokenRefresher::new(
            ToolSource::Dropbox,
            "http://127.0.0.1:1/token",
            None,
            reqwest::Client::new(),
        );
        let mut credentials = expired(Some("refresh"));

        let err = refresher.refresh(&mut credentials).await.unwrap_err();
        assert!(matches!(err, ConnectorError::RefreshUnavailable(ToolSource::Dropbox)));
    }

    #[tokio::test]
    async fn test_slack_style_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":false,"error":"invalid_refresh_token"}"#)
            .create_async()
            .await;

        let refresher = TokenRefresher::new(
            ToolSource::Slack,
            format!("{}/token", server.url()),
            Some(client()),
            reqwest::Client::new(),
        );
        let mut credentials = expired(Some("refresh"));

        let err = refresher.ensure_fresh(&mut credentials).await.unwrap_err();
        assert!(err.to_string().contains("invalid_refresh_token"));
        assert_eq!(credentials.access_token, "old-token");
    }
}
