//! Notion connector
//!
//! Notion's public API can archive pages but exposes no file deletion, so
//! every request is reported as unsupported.

use async_trait::async_trait;
use clutterscore_core::models::ToolSource;

use crate::traits::{Connector, ConnectorCredentials, ConnectorError, ConnectorResult, FileMetadata};

#[derive(Debug, Default)]
pub struct NotionConnector;

impl NotionConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for NotionConnector {
    fn source(&self) -> ToolSource {
        ToolSource::Notion
    }

    async fn delete_file(
        &self,
        _credentials: &mut ConnectorCredentials,
        _external_id: &str,
        _metadata: &FileMetadata,
    ) -> ConnectorResult<()> {
        Err(ConnectorError::Unsupported(ToolSource::Notion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokens_cannot_be_refreshed() {
        let mut credentials = ConnectorCredentials {
            access_token: "secret_notion".to_string(),
            refresh_token: None,
            expires_at: None,
            tenant_id: "t1".to_string(),
        };

        let err = NotionConnector::new()
            .refresh_credentials(&mut credentials)
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::RefreshUnavailable(ToolSource::Notion)));
        assert_eq!(credentials.access_token, "secret_notion");
    }
}
