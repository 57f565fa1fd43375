use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ToolSource;

/// OAuth credentials a tenant granted for one platform.
/// At most one integration exists per (organization, source).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Integration {
    pub id: String,
    pub organization_id: String,
    pub source: ToolSource,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub connected_at: DateTime<Utc>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Rotated token material to persist after a connector refreshed it.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenUpdate {
    pub access_token: String,
    /// `None` keeps the stored refresh token.
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Integration as exposed to clients; never carries token material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSummary {
    pub id: String,
    pub source: ToolSource,
    pub is_active: bool,
    pub connected_at: DateTime<Utc>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Integration> for IntegrationSummary {
    fn from(integration: Integration) -> Self {
        Self {
            id: integration.id,
            source: integration.source,
            is_active: integration.is_active,
            connected_at: integration.connected_at,
            last_synced_at: integration.last_synced_at,
            expires_at: integration.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IntegrationListResponse {
    pub integrations: Vec<IntegrationSummary>,
}

/// Body of the disconnect and refresh-token requests
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IntegrationSourceRequest {
    pub source: ToolSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationActionResponse {
    pub success: bool,
    pub message: String,
    pub integration: IntegrationSummary,
}
