use std::sync::Arc;
use std::time::Duration;

use clutterscore_core::{models::ToolSource, Config};

use crate::dropbox::DropboxConnector;
use crate::google_drive::GoogleDriveConnector;
use crate::microsoft::MicrosoftConnector;
use crate::notion::NotionConnector;
use crate::slack::SlackConnector;
use crate::traits::{Connector, ConnectorResult};

/// Resolves the connector for a platform.
///
/// Platforms form a closed set, so resolution cannot fail.
pub trait ConnectorFactory: Send + Sync {
    fn connector_for(&self, source: ToolSource) -> Arc<dyn Connector>;
}

/// Factory backed by the real platform connectors, sharing one HTTP client.
pub struct DefaultConnectorFactory {
    slack: Arc<SlackConnector>,
    google: Arc<GoogleDriveConnector>,
    microsoft: Arc<MicrosoftConnector>,
    notion: Arc<NotionConnector>,
    dropbox: Arc<DropboxConnector>,
}

impl DefaultConnectorFactory {
    pub fn from_config(config: &Config) -> ConnectorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.connector_timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            slack: Arc::new(SlackConnector::new(
                http.clone(),
                config.oauth_client(ToolSource::Slack).cloned(),
            )),
            google: Arc::new(GoogleDriveConnector::new(
                http.clone(),
                config.oauth_client(ToolSource::Google).cloned(),
            )),
            microsoft: Arc::new(MicrosoftConnector::new(
                http.clone(),
                config.oauth_client(ToolSource::Microsoft).cloned(),
            )),
            notion: Arc::new(NotionConnector::new()),
            dropbox: Arc::new(DropboxConnector::new(
                http,
                config.oauth_client(ToolSource::Dropbox).cloned(),
            )),
        })
    }
}

impl ConnectorFactory for DefaultConnectorFactory {
    fn connector_for(&self, source: ToolSource) -> Arc<dyn Connector> {
        match source {
            ToolSource::Slack => self.slack.clone(),
            ToolSource::Google => self.google.clone(),
            ToolSource::Microsoft => self.microsoft.clone(),
            ToolSource::Notion => self.notion.clone(),
            ToolSource::Dropbox => self.dropbox.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server_port: 4000,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: "postgresql://localhost/clutterscore".to_string(),
            db_max_connections: 5,
            db_timeout_seconds: 5,
            jwt_secret: "x".repeat(32),
            request_timeout_secs: 60,
            connector_timeout_secs: 5,
            audit_not_found_attempts: false,
            log_format: "pretty".to_string(),
            slack_oauth: None,
            google_oauth: None,
            microsoft_oauth: None,
            dropbox_oauth: None,
        }
    }

    #[test]
    fn test_every_source_resolves_to_matching_connector() {
        let factory = DefaultConnectorFactory::from_config(&config()).unwrap();
        for source in ToolSource::ALL {
            assert_eq!(factory.connector_for(source).source(), source);
        }
    }
}
