//! Connector abstraction trait
//!
//! This module defines the Connector trait every platform adapter implements,
//! together with the credential and metadata types passed to it.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use clutterscore_core::models::{Integration, ToolSource};
use thiserror::Error;

/// Tokens expiring within this window are refreshed before use.
pub const TOKEN_REFRESH_SKEW_SECS: i64 = 60;

/// Connector operation errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Deletion not supported for {0}")]
    Unsupported(ToolSource),

    #[error("Access token for {0} has expired and no refresh is possible")]
    TokenExpired(ToolSource),

    #[error("No refresh token or OAuth client available for {0}")]
    RefreshUnavailable(ToolSource),

    #[error("Token refresh failed for {platform}: {message}")]
    TokenRefresh { platform: ToolSource, message: String },

    #[error("{platform} API error: {message}")]
    Api { platform: ToolSource, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ConnectorError {
    /// True when the platform cannot delete files at all, as opposed to a
    /// deletion that was attempted and failed.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ConnectorError::Unsupported(_))
            || self.to_string().contains("not supported")
    }
}

/// Result type for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Credentials handed to a connector for a single call.
///
/// Built from the stored integration and discarded afterwards. A connector
/// that refreshes the access token writes the new values back here.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorCredentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub tenant_id: String,
}

impl ConnectorCredentials {
    pub fn from_integration(integration: &Integration) -> Self {
        Self {
            access_token: integration.access_token.clone(),
            refresh_token: integration.refresh_token.clone(),
            expires_at: integration.expires_at,
            tenant_id: integration.organization_id.clone(),
        }
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now + Duration::seconds(TOKEN_REFRESH_SKEW_SECS))
    }
}

/// What the platform may need besides the external ID to locate the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub name: String,
    pub path: Option<String>,
    pub mime_type: Option<String>,
}

#[async_trait]
pub trait Connector: Send + Sync {
    fn source(&self) -> ToolSource;

    /// Delete `external_id` on the platform.
    ///
    /// A file that is already gone on the platform counts as deleted.
    async fn delete_file(
        &self,
        credentials: &mut ConnectorCredentials,
        external_id: &str,
        metadata: &FileMetadata,
    ) -> ConnectorResult<()>;

    /// Exchange the refresh token for a new access token now, writing the
    /// rotated values into `credentials`.
    async fn refresh_credentials(&self, _credentials: &mut ConnectorCredentials) -> ConnectorResult<()> {
        Err(ConnectorError::RefreshUnavailable(self.source()))
    }
}

/// Map a non-success platform response to an API error carrying the body.
pub(crate) async fn api_error(platform: ToolSource, response: reqwest::Response) -> ConnectorError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    ConnectorError::Api {
        platform,
        message: format!("{} - {}", status, body),
    }
}
