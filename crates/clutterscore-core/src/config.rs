//! Configuration module
//!
//! Environment-driven configuration for the API service: server, database,
//! authentication, connector and audit settings.

use std::env;
use std::time::Duration;

use crate::models::ToolSource;

const DEFAULT_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const CONNECTOR_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 60;
/// Headroom the request deadline keeps over the connector deadline for the
/// local writes that follow a remote call.
pub const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 5;

/// OAuth client credentials used to refresh a platform's access tokens.
#[derive(Clone, Debug)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub request_timeout_secs: u64,
    /// Deadline applied to every remote deletion call.
    pub connector_timeout_secs: u64,
    /// Write FAILURE audit entries for lookups that end in NotFound.
    pub audit_not_found_attempts: bool,
    pub log_format: String,
    pub slack_oauth: Option<OAuthClient>,
    pub google_oauth: Option<OAuthClient>,
    pub microsoft_oauth: Option<OAuthClient>,
    pub dropbox_oauth: Option<OAuthClient>,
}

fn oauth_client_from_env(prefix: &str) -> Option<OAuthClient> {
    let client_id = env::var(format!("{}_CLIENT_ID", prefix))
        .ok()
        .filter(|s| !s.is_empty())?;
    let client_secret = env::var(format!("{}_CLIENT_SECRET", prefix))
        .ok()
        .filter(|s| !s.is_empty())?;
    Some(OAuthClient {
        client_id,
        client_secret,
    })
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            connector_timeout_secs: env::var("CONNECTOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| CONNECTOR_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTOR_TIMEOUT_SECS),
            audit_not_found_attempts: env::var("AUDIT_NOT_FOUND_ATTEMPTS")
                .unwrap_or_else(|_| "false".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(false),
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase(),
            slack_oauth: oauth_client_from_env("SLACK"),
            google_oauth: oauth_client_from_env("GOOGLE"),
            microsoft_oauth: oauth_client_from_env("MICROSOFT"),
            dropbox_oauth: oauth_client_from_env("DROPBOX"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.connector_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "CONNECTOR_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.request_timeout_secs < self.connector_timeout_secs + REQUEST_TIMEOUT_MARGIN_SECS {
            return Err(anyhow::anyhow!(
                "REQUEST_TIMEOUT_SECS must exceed CONNECTOR_TIMEOUT_SECS by at least {}s",
                REQUEST_TIMEOUT_MARGIN_SECS
            ));
        }

        if self.log_format != "json" && self.log_format != "pretty" {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'json' or 'pretty'"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connector_timeout(&self) -> Duration {
        Duration::from_secs(self.connector_timeout_secs)
    }

    pub fn audit_not_found_attempts(&self) -> bool {
        self.audit_not_found_attempts
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }

    /// OAuth client used to refresh tokens for `source`, if configured.
    /// Notion issues non-expiring tokens and never needs one.
    pub fn oauth_client(&self, source: ToolSource) -> Option<&OAuthClient> {
        match source {
            ToolSource::Slack => self.slack_oauth.as_ref(),
            ToolSource::Google => self.google_oauth.as_ref(),
            ToolSource::Microsoft => self.microsoft_oauth.as_ref(),
            ToolSource::Dropbox => self.dropbox_oauth.as_ref(),
            ToolSource::Notion => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: "postgresql://localhost/clutterscore".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            jwt_secret: "a".repeat(32),
            request_timeout_secs: 60,
            connector_timeout_secs: 30,
            audit_not_found_attempts: false,
            log_format: "pretty".to_string(),
            slack_oauth: None,
            google_oauth: None,
            microsoft_oauth: None,
            dropbox_oauth: None,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = base_config();
        config.jwt_secret = "short".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_validate_accepts_both_postgres_schemes() {
        let mut config = base_config();
        config.database_url = "postgres://localhost/clutterscore".to_string();
        assert!(config.validate().is_ok());

        config.database_url = "mysql://localhost/clutterscore".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_connector_timeout() {
        let mut config = base_config();
        config.connector_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_request_timeout_margin() {
        let mut config = base_config();
        config.request_timeout_secs = config.connector_timeout_secs;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));

        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = config.connector_timeout_secs + REQUEST_TIMEOUT_MARGIN_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oauth_client_lookup_by_source() {
        let mut config = base_config();
        config.google_oauth = Some(OAuthClient {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        });
        assert!(config.oauth_client(ToolSource::Google).is_some());
        assert!(config.oauth_client(ToolSource::Slack).is_none());
        assert!(config.oauth_client(ToolSource::Notion).is_none());
    }
}
