//! Security audit events
//!
//! Structured `audit` target tracing events for authentication, file
//! deletion and integration management. These complement the persisted compliance log; they are emitted
//! even for outcomes that are never written to the database.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    AuthenticationSuccess,
    AuthenticationFailure,
    FileDeleted,
    FileDeletionRejected,
    FileDeletionFailed,
    IntegrationDisconnected,
    IntegrationTokenRefreshed,
    IntegrationTokenRefreshFailed,
}

#[derive(Debug, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: AuditEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditLogEntry {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            event_type,
            tenant_id: None,
            user_id: None,
            details: None,
            success: true,
            error_message: None,
        }
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failure
    pub fn with_failure(mut self, error_message: String) -> Self {
        self.success = false;
        self.error_message = Some(error_message);
        self
    }

    /// Emit the entry on the `audit` target
    pub fn log(&self) {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());

        if self.success {
            tracing::event!(
                target: "audit",
                tracing::Level::INFO,
                audit_entry = %json,
                event_type = ?self.event_type,
                tenant_id = ?self.tenant_id,
                user_id = ?self.user_id,
                success = self.success,
                "Security audit log"
            );
        } else {
            tracing::event!(
                target: "audit",
                tracing::Level::WARN,
                audit_entry = %json,
                event_type = ?self.event_type,
                tenant_id = ?self.tenant_id,
                user_id = ?self.user_id,
                success = self.success,
                error = ?self.error_message,
                "Security audit log - failure"
            );
        }
    }
}

pub fn log_authentication_attempt(
    tenant_id: Option<&str>,
    user_id: Option<&str>,
    success: bool,
    error_message: Option<String>,
) {
    let event_type = if success {
        AuditEventType::AuthenticationSuccess
    } else {
        AuditEventType::AuthenticationFailure
    };
    let mut entry = AuditLogEntry::new(event_type);
    if let Some(tenant_id) = tenant_id {
        entry = entry.with_tenant_id(tenant_id);
    }
    if let Some(user_id) = user_id {
        entry = entry.with_user_id(user_id);
    }
    if let Some(error) = error_message {
        entry = entry.with_failure(error);
    }
    entry.log();
}

pub fn log_file_deleted(
    tenant_id: &str,
    user_id: &str,
    file_id: &str,
    external_deletion_success: bool,
) {
    AuditLogEntry::new(AuditEventType::FileDeleted)
        .with_tenant_id(tenant_id)
        .with_user_id(user_id)
        .with_details(serde_json::json!({
            "file_id": file_id,
            "external_deletion_success": external_deletion_success,
        }))
        .log();
}

/// A deletion refused before any mutation, e.g. an unknown or foreign file
pub fn log_file_deletion_rejected(tenant_id: &str, user_id: &str, file_id: &str, reason: &str) {
    AuditLogEntry::new(AuditEventType::FileDeletionRejected)
        .with_tenant_id(tenant_id)
        .with_user_id(user_id)
        .with_details(serde_json::json!({ "file_id": file_id }))
        .with_failure(reason.to_string())
        .log();
}

pub fn log_file_deletion_failed(tenant_id: &str, user_id: &str, file_id: &str, error: &str) {
    AuditLogEntry::new(AuditEventType::FileDeletionFailed)
        .with_tenant_id(tenant_id)
        .with_user_id(user_id)
        .with_details(serde_json::json!({ "file_id": file_id }))
        .with_failure(error.to_string())
        .log();
}

pub fn log_integration_disconnected(tenant_id: &str, user_id: &str, source: &str) {
    AuditLogEntry::new(AuditEventType::IntegrationDisconnected)
        .with_tenant_id(tenant_id)
        .with_user_id(user_id)
        .with_details(serde_json::json!({ "source": source }))
        .log();
}

pub fn log_integration_token_refresh(
    tenant_id: &str,
    user_id: &str,
    source: &str,
    error: Option<&str>,
) {
    let event_type = match error {
        None => AuditEventType::IntegrationTokenRefreshed,
        Some(_) => AuditEventType::IntegrationTokenRefreshFailed,
    };
    let mut entry = AuditLogEntry::new(event_type)
        .with_tenant_id(tenant_id)
        .with_user_id(user_id)
        .with_details(serde_json::json!({ "source": source }));
    if let Some(error) = error {
        entry = entry.with_failure(error.to_string());
    }
    entry.log();
}
