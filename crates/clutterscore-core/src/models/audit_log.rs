use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DELETE_FILE_ACTION: &str = "DELETE_FILE";
pub const FILE_TARGET_TYPE: &str = "File";
pub const DISCONNECT_INTEGRATION_ACTION: &str = "DISCONNECT_INTEGRATION";
pub const REFRESH_TOKEN_ACTION: &str = "REFRESH_INTEGRATION_TOKEN";
pub const INTEGRATION_TARGET_TYPE: &str = "Integration";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "audit_log_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditLogStatus {
    Success,
    Failure,
}

/// Compliance audit trail entry. Append-only; one per terminal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuditLog {
    pub id: String,
    pub organization_id: String,
    pub user_id: Option<String>,
    pub action_type: String,
    pub target: String,
    pub target_type: String,
    pub executor: String,
    pub status: AuditLogStatus,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub organization_id: String,
    pub user_id: Option<String>,
    pub action_type: String,
    pub target: String,
    pub target_type: String,
    pub executor: String,
    pub status: AuditLogStatus,
    pub details: serde_json::Value,
}

/// Human readable executor label recorded on audit entries.
pub fn user_executor(email: &str) -> String {
    format!("User {}", email)
}

#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub status: Option<AuditLogStatus>,
    /// Case-insensitive substring matched against action type, target and executor.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: String,
    pub action_type: String,
    pub target: String,
    pub target_type: String,
    pub executor: String,
    pub status: AuditLogStatus,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogResponse {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            action_type: log.action_type,
            target: log.target,
            target_type: log.target_type,
            executor: log.executor,
            status: log.status,
            details: log.details,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogListResponse {
    pub logs: Vec<AuditLogResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
