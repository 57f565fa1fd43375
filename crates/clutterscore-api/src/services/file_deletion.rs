//! File deletion reconciliation
//!
//! Deleting a file touches two systems that cannot share a transaction: the
//! platform the file lives on and the local record store. The remote
//! deletion is attempted first and may fail without aborting anything; the
//! local soft delete and both audit trails are written regardless, recording
//! what happened remotely. Only a failure of the local store aborts the
//! operation, in which case a FAILURE audit entry is attempted.

use std::sync::Arc;
use std::time::Duration;

use clutterscore_connectors::{ConnectorCredentials, ConnectorFactory, FileMetadata};
use clutterscore_core::models::{
    user_executor, AuditLogStatus, DeleteFileResponse, File, Integration, NewActivity,
    NewAuditLog, TokenUpdate, DELETE_FILE_ACTION, FILE_DELETED_ACTION, FILE_TARGET_TYPE,
};
use clutterscore_core::AppError;
use clutterscore_db::{ActivityStore, AuditLogStore, FileStore, IntegrationStore};
use serde_json::json;

use crate::auth::models::TenantContext;
use crate::middleware::audit;
use crate::state::DbState;

pub const FILE_NOT_FOUND: &str = "File not found";
pub const INTEGRATION_NOT_FOUND: &str = "Integration not found for this file";

pub const DELETED_EVERYWHERE_MESSAGE: &str =
    "File deleted successfully from platform and database";
pub const UNSUPPORTED_MESSAGE: &str =
    "File marked as deleted (platform does not support automatic deletion)";
pub const DELETED_LOCALLY_MESSAGE: &str =
    "File marked as deleted locally, but external deletion failed";
pub const ALREADY_DELETED_MESSAGE: &str = "File already deleted";

/// What happened on the external platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Deleted,
    /// The platform has no deletion capability
    Unsupported(String),
    Failed(String),
}

impl RemoteOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, RemoteOutcome::Deleted)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RemoteOutcome::Deleted => None,
            RemoteOutcome::Unsupported(message) | RemoteOutcome::Failed(message) => Some(message),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RemoteOutcome::Deleted => DELETED_EVERYWHERE_MESSAGE,
            RemoteOutcome::Unsupported(_) => UNSUPPORTED_MESSAGE,
            RemoteOutcome::Failed(_) => DELETED_LOCALLY_MESSAGE,
        }
    }
}

#[derive(Clone)]
pub struct FileDeletionService {
    files: Arc<dyn FileStore>,
    integrations: Arc<dyn IntegrationStore>,
    activities: Arc<dyn ActivityStore>,
    audit_logs: Arc<dyn AuditLogStore>,
    connectors: Arc<dyn ConnectorFactory>,
    connector_timeout: Duration,
    audit_not_found: bool,
}

impl FileDeletionService {
    pub fn new(
        db: &DbState,
        connectors: Arc<dyn ConnectorFactory>,
        connector_timeout: Duration,
        audit_not_found: bool,
    ) -> Self {
        Self {
            files: db.files.clone(),
            integrations: db.integrations.clone(),
            activities: db.activities.clone(),
            audit_logs: db.audit_logs.clone(),
            connectors,
            connector_timeout,
            audit_not_found,
        }
    }

    /// Delete `file_id` on its platform and locally.
    ///
    /// Returns `NotFound` when the file or its integration is missing for the
    /// caller's tenant, with nothing mutated. Any store failure becomes
    /// `OperationFailed` carrying the underlying message.
    #[tracing::instrument(
        skip(self, ctx),
        fields(tenant_id = %ctx.tenant_id, user_id = %ctx.user_id, file_id = %file_id)
    )]
    pub async fn delete_file(
        &self,
        ctx: &TenantContext,
        file_id: &str,
    ) -> Result<DeleteFileResponse, AppError> {
        match self.reconcile(ctx, file_id).await {
            Ok(response) => Ok(response),
            Err(AppError::NotFound(message)) => {
                audit::log_file_deletion_rejected(&ctx.tenant_id, &ctx.user_id, file_id, &message);
                if self.audit_not_found {
                    self.record_failure(ctx, file_id, &message).await;
                }
                Err(AppError::NotFound(message))
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(error = %err, "File deletion failed");
                audit::log_file_deletion_failed(&ctx.tenant_id, &ctx.user_id, file_id, &message);
                self.record_failure(ctx, file_id, &message).await;
                Err(AppError::OperationFailed(message))
            }
        }
    }

    async fn reconcile(
        &self,
        ctx: &TenantContext,
        file_id: &str,
    ) -> Result<DeleteFileResponse, AppError> {
        let file = self
            .files
            .find_for_tenant(&ctx.tenant_id, file_id)
            .await?
            .ok_or_else(|| AppError::NotFound(FILE_NOT_FOUND.to_string()))?;

        if file.is_deleted() {
            tracing::debug!("File already deleted, nothing to reconcile");
            return Ok(DeleteFileResponse {
                success: true,
                message: ALREADY_DELETED_MESSAGE.to_string(),
                external_deletion_success: false,
                external_error: None,
            });
        }

        let integration = self
            .integrations
            .find_by_source(&ctx.tenant_id, file.source)
            .await?
            .ok_or_else(|| AppError::NotFound(INTEGRATION_NOT_FOUND.to_string()))?;

        let outcome = self.delete_remote(&file, &integration).await;

        if !self.files.mark_deleted(&ctx.tenant_id, &file.id).await? {
            return Err(AppError::NotFound(FILE_NOT_FOUND.to_string()));
        }

        let activity = NewActivity {
            organization_id: ctx.tenant_id.clone(),
            user_id: ctx.user_id.clone(),
            action: FILE_DELETED_ACTION.to_string(),
            metadata: json!({
                "fileId": file.id,
                "fileName": file.name,
                "source": file.source,
                "size": file.size_mb,
                "externalDeletionSuccess": outcome.succeeded(),
                "externalError": outcome.error(),
            }),
        };
        let entry = NewAuditLog {
            organization_id: ctx.tenant_id.clone(),
            user_id: Some(ctx.user_id.clone()),
            action_type: DELETE_FILE_ACTION.to_string(),
            target: file.name.clone(),
            target_type: FILE_TARGET_TYPE.to_string(),
            executor: user_executor(&ctx.email),
            status: AuditLogStatus::Success,
            details: json!({
                "source": file.source,
                "size": file.size_mb,
                "path": file.path,
                "externalDeletionSuccess": outcome.succeeded(),
                "externalError": outcome.error(),
            }),
        };
        // The SUCCESS entry goes last, so a failed activity write can only
        // ever be followed by the FAILURE entry.
        self.activities.append(activity).await?;
        self.audit_logs.append(entry).await?;

        audit::log_file_deleted(&ctx.tenant_id, &ctx.user_id, &file.id, outcome.succeeded());

        Ok(DeleteFileResponse {
            success: true,
            message: outcome.message().to_string(),
            external_deletion_success: outcome.succeeded(),
            external_error: outcome.error().map(String::from),
        })
    }

    /// Attempt the platform deletion. Never fails; every error is an outcome.
    async fn delete_remote(&self, file: &File, integration: &Integration) -> RemoteOutcome {
        let Some(external_id) = file.external_id.as_deref() else {
            return RemoteOutcome::Failed(format!(
                "File has no external identifier on {}",
                file.source
            ));
        };

        let connector = self.connectors.connector_for(file.source);
        let mut credentials = ConnectorCredentials::from_integration(integration);
        let metadata = FileMetadata {
            name: file.name.clone(),
            path: file.path.clone(),
            mime_type: file.mime_type.clone(),
        };

        let result = tokio::time::timeout(
            self.connector_timeout,
            connector.delete_file(&mut credentials, external_id, &metadata),
        )
        .await;

        let outcome = match result {
            Ok(Ok(())) => RemoteOutcome::Deleted,
            Ok(Err(err)) if err.is_unsupported() => {
                tracing::warn!(
                    source = %file.source,
                    "Deletion not supported by platform, proceeding with local deletion only"
                );
                RemoteOutcome::Unsupported(err.to_string())
            }
            Ok(Err(err)) => {
                tracing::warn!(source = %file.source, error = %err, "External deletion failed");
                RemoteOutcome::Failed(err.to_string())
            }
            Err(_) => {
                tracing::warn!(source = %file.source, "External deletion timed out");
                RemoteOutcome::Failed(format!(
                    "Deletion on {} timed out after {}s",
                    file.source,
                    self.connector_timeout.as_secs()
                ))
            }
        };

        // A refresh may have rotated the tokens before the deletion itself
        // failed; the old refresh token may already be revoked.
        self.persist_rotated_tokens(integration, &credentials).await;
        outcome
    }

    /// Write back a token the connector refreshed, whatever the deletion
    /// outcome. Concurrent rotations race and the last write wins.
    async fn persist_rotated_tokens(
        &self,
        integration: &Integration,
        credentials: &ConnectorCredentials,
    ) {
        if credentials.access_token == integration.access_token {
            return;
        }

        let update = TokenUpdate {
            access_token: credentials.access_token.clone(),
            refresh_token: credentials
                .refresh_token
                .clone()
                .filter(|token| integration.refresh_token.as_ref() != Some(token)),
            expires_at: credentials.expires_at,
        };

        if let Err(err) = self.integrations.update_tokens(&integration.id, &update).await {
            tracing::warn!(
                integration_id = %integration.id,
                error = %err,
                "Failed to persist refreshed integration tokens"
            );
        }
    }

    /// Best-effort FAILURE entry. Its own failure is logged and dropped.
    async fn record_failure(&self, ctx: &TenantContext, target: &str, error: &str) {
        let entry = NewAuditLog {
            organization_id: ctx.tenant_id.clone(),
            user_id: Some(ctx.user_id.clone()),
            action_type: DELETE_FILE_ACTION.to_string(),
            target: target.to_string(),
            target_type: FILE_TARGET_TYPE.to_string(),
            executor: user_executor(&ctx.email),
            status: AuditLogStatus::Failure,
            details: json!({ "error": error }),
        };

        if let Err(err) = self.audit_logs.append(entry).await {
            tracing::error!(error = %err, "Failed to write failure audit log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserRole;
    use chrono::{Duration as ChronoDuration, Utc};
    use clutterscore_connectors::{MockConnectorFactory, MockOutcome};
    use clutterscore_core::models::{FileStatus, ToolSource};
    use clutterscore_db::{FailPoint, MemoryStore};

    struct Harness {
        store: MemoryStore,
        connectors: Arc<MockConnectorFactory>,
        service: FileDeletionService,
    }

    fn harness_with(timeout: Duration, audit_not_found: bool) -> Harness {
        let store = MemoryStore::new();
        let connectors = Arc::new(MockConnectorFactory::new());
        let service = FileDeletionService::new(
            &DbState::shared(store.clone()),
            connectors.clone(),
            timeout,
            audit_not_found,
        );
        Harness {
            store,
            connectors,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(Duration::from_secs(5), false)
    }

    fn ctx(tenant_id: &str) -> TenantContext {
        TenantContext {
            tenant_id: tenant_id.to_string(),
            user_id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            role: UserRole::Member,
        }
    }

    fn file(id: &str, tenant_id: &str, source: ToolSource) -> File {
        let now = Utc::now();
        File {
            id: id.to_string(),
            audit_result_id: format!("ar-{}", tenant_id),
            organization_id: tenant_id.to_string(),
            source,
            external_id: Some("ext-1".to_string()),
            name: "Q3 report.pdf".to_string(),
            path: Some("/finance/Q3 report.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            size_mb: 12.5,
            status: FileStatus::Active,
            last_accessed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn integration(tenant_id: &str, source: ToolSource) -> Integration {
        Integration {
            id: format!("int-{}-{}", tenant_id, source),
            organization_id: tenant_id.to_string(),
            source,
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            expires_at: Some(Utc::now() + ChronoDuration::hours(1)),
            is_active: true,
            connected_at: Utc::now(),
            last_synced_at: None,
        }
    }

    fn seed(h: &Harness) {
        h.store.insert_file(file("f1", "t1", ToolSource::Slack));
        h.store.insert_integration(integration("t1", ToolSource::Slack));
    }

    #[tokio::test]
    async fn test_remote_success_deletes_everywhere() {
        let h = harness();
        seed(&h);

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert_eq!(
            response,
            DeleteFileResponse {
                success: true,
                message: DELETED_EVERYWHERE_MESSAGE.to_string(),
                external_deletion_success: true,
                external_error: None,
            }
        );
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Deleted);

        let calls = h.connectors.connector(ToolSource::Slack).calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].external_id, "ext-1");
        assert_eq!(calls[0].tenant_id, "t1");
        assert_eq!(calls[0].metadata.name, "Q3 report.pdf");

        let activities = h.store.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].action, "file.deleted");
        assert_eq!(activities[0].metadata["fileId"], "f1");
        assert_eq!(activities[0].metadata["source"], "SLACK");
        assert_eq!(activities[0].metadata["externalDeletionSuccess"], true);
        assert!(activities[0].metadata["externalError"].is_null());

        let logs = h.store.audit_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, AuditLogStatus::Success);
        assert_eq!(logs[0].action_type, "DELETE_FILE");
        assert_eq!(logs[0].target, "Q3 report.pdf");
        assert_eq!(logs[0].target_type, "File");
        assert_eq!(logs[0].executor, "User ada@example.com");
        assert_eq!(logs[0].details["path"], "/finance/Q3 report.pdf");
        assert_eq!(logs[0].details["size"], 12.5);
        assert!(h.store.token_updates().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_platform_still_deletes_locally() {
        let h = harness();
        seed(&h);
        h.connectors
            .connector(ToolSource::Slack)
            .set_outcome(MockOutcome::Unsupported);

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert!(response.success);
        assert_eq!(response.message, UNSUPPORTED_MESSAGE);
        assert!(!response.external_deletion_success);
        assert_eq!(
            response.external_error.as_deref(),
            Some("Deletion not supported for SLACK")
        );
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Deleted);
        assert_eq!(h.store.activities().len(), 1);
        assert_eq!(h.store.audit_logs()[0].status, AuditLogStatus::Success);
    }

    #[tokio::test]
    async fn test_remote_failure_is_recorded_not_fatal() {
        let h = harness();
        seed(&h);
        h.connectors
            .connector(ToolSource::Slack)
            .set_outcome(MockOutcome::Fail("rate_limited".to_string()));

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert_eq!(response.message, DELETED_LOCALLY_MESSAGE);
        assert_eq!(
            response.external_error.as_deref(),
            Some("SLACK API error: rate_limited")
        );
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Deleted);
        assert_eq!(
            h.store.activities()[0].metadata["externalError"],
            "SLACK API error: rate_limited"
        );
        assert_eq!(
            h.store.audit_logs()[0].details["externalError"],
            "SLACK API error: rate_limited"
        );
    }

    #[tokio::test]
    async fn test_missing_external_id_is_a_remote_failure() {
        let h = harness();
        let mut orphan = file("f1", "t1", ToolSource::Google);
        orphan.external_id = None;
        h.store.insert_file(orphan);
        h.store.insert_integration(integration("t1", ToolSource::Google));

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert_eq!(response.message, DELETED_LOCALLY_MESSAGE);
        assert_eq!(
            response.external_error.as_deref(),
            Some("File has no external identifier on GOOGLE")
        );
        assert!(h.connectors.connector(ToolSource::Google).calls().is_empty());
    }

    #[tokio::test]
    async fn test_hanging_connector_times_out() {
        let h = harness_with(Duration::from_millis(50), false);
        seed(&h);
        h.connectors
            .connector(ToolSource::Slack)
            .set_outcome(MockOutcome::Hang);

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert_eq!(response.message, DELETED_LOCALLY_MESSAGE);
        assert!(response
            .external_error
            .unwrap()
            .starts_with("Deletion on SLACK timed out"));
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Deleted);
    }

    #[tokio::test]
    async fn test_rotated_tokens_persisted_once() {
        let h = harness();
        seed(&h);
        let expires_at = Utc::now() + ChronoDuration::hours(2);
        h.connectors.connector(ToolSource::Slack).rotate_token(
            "access-2",
            Some("refresh-2"),
            Some(expires_at),
        );

        h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        let updates = h.store.token_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "int-t1-SLACK");
        assert_eq!(
            updates[0].1,
            TokenUpdate {
                access_token: "access-2".to_string(),
                refresh_token: Some("refresh-2".to_string()),
                expires_at: Some(expires_at),
            }
        );
        assert_eq!(
            h.store.integration("int-t1-SLACK").unwrap().access_token,
            "access-2"
        );
    }

    #[tokio::test]
    async fn test_rotated_tokens_persisted_when_remote_fails() {
        let h = harness();
        seed(&h);
        let slack = h.connectors.connector(ToolSource::Slack);
        slack.rotate_token("access-2", Some("refresh-2"), None);
        slack.set_outcome(MockOutcome::Fail("cant_delete_file".to_string()));

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert_eq!(response.message, DELETED_LOCALLY_MESSAGE);
        let updates = h.store.token_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.access_token, "access-2");
        assert_eq!(updates[0].1.refresh_token.as_deref(), Some("refresh-2"));
        let stored = h.store.integration("int-t1-SLACK").unwrap();
        assert_eq!(stored.access_token, "access-2");
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn test_rotated_tokens_persisted_when_remote_times_out() {
        let h = harness_with(Duration::from_millis(50), false);
        seed(&h);
        let slack = h.connectors.connector(ToolSource::Slack);
        slack.rotate_token("access-2", None, None);
        slack.set_outcome(MockOutcome::Hang);

        h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert_eq!(
            h.store.integration("int-t1-SLACK").unwrap().access_token,
            "access-2"
        );
    }

    #[tokio::test]
    async fn test_token_persist_failure_is_not_fatal() {
        let h = harness();
        seed(&h);
        h.connectors
            .connector(ToolSource::Slack)
            .rotate_token("access-2", None, None);
        h.store.fail_on(FailPoint::UpdateTokens);

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert!(response.external_deletion_success);
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Deleted);
    }

    #[tokio::test]
    async fn test_already_deleted_short_circuits() {
        let h = harness();
        seed(&h);
        h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        let response = h.service.delete_file(&ctx("t1"), "f1").await.unwrap();

        assert_eq!(response.message, ALREADY_DELETED_MESSAGE);
        assert!(response.success);
        assert!(!response.external_deletion_success);
        assert_eq!(h.connectors.connector(ToolSource::Slack).calls().len(), 1);
        assert_eq!(h.store.activities().len(), 1);
        assert_eq!(h.store.audit_logs().len(), 1);
    }

    #[tokio::test]
    async fn test_foreign_tenant_gets_not_found() {
        let h = harness();
        seed(&h);

        let err = h.service.delete_file(&ctx("t2"), "f1").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m) if m == FILE_NOT_FOUND));
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Active);
        assert!(h.store.audit_logs().is_empty());
        assert!(h.store.activities().is_empty());
    }

    #[tokio::test]
    async fn test_missing_integration_gets_not_found() {
        let h = harness();
        h.store.insert_file(file("f1", "t1", ToolSource::Dropbox));

        let err = h.service.delete_file(&ctx("t1"), "f1").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m) if m == INTEGRATION_NOT_FOUND));
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Active);
        assert!(h.connectors.connector(ToolSource::Dropbox).calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_audited_when_enabled() {
        let h = harness_with(Duration::from_secs(5), true);

        let err = h.service.delete_file(&ctx("t1"), "missing").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        let logs = h.store.audit_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, AuditLogStatus::Failure);
        assert_eq!(logs[0].target, "missing");
        assert_eq!(logs[0].details["error"], FILE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_records_single_failure_entry() {
        let h = harness();
        seed(&h);
        h.store.fail_on(FailPoint::MarkDeleted);

        let err = h.service.delete_file(&ctx("t1"), "f1").await.unwrap_err();

        assert!(matches!(err, AppError::OperationFailed(_)));
        assert_eq!(err.to_string(), "Service unavailable: MarkDeleted unavailable");
        let logs = h.store.audit_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, AuditLogStatus::Failure);
        assert_eq!(logs[0].target, "f1");
        assert_eq!(
            logs[0].details["error"],
            "Service unavailable: MarkDeleted unavailable"
        );
        assert!(h.store.activities().is_empty());
    }

    #[tokio::test]
    async fn test_activity_write_failure_leaves_only_failure_entry() {
        let h = harness();
        seed(&h);
        h.store.fail_on(FailPoint::AppendActivity);

        let err = h.service.delete_file(&ctx("t1"), "f1").await.unwrap_err();

        assert_eq!(err.to_string(), "Service unavailable: AppendActivity unavailable");
        let logs = h.store.audit_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, AuditLogStatus::Failure);
        assert_eq!(logs[0].target, "f1");
        assert!(h.store.activities().is_empty());
    }

    #[tokio::test]
    async fn test_success_entry_write_failure_is_not_audited_as_success() {
        let h = harness();
        seed(&h);
        h.store.fail_on(FailPoint::AppendAuditLog);

        let err = h.service.delete_file(&ctx("t1"), "f1").await.unwrap_err();

        assert!(matches!(err, AppError::OperationFailed(_)));
        assert_eq!(h.store.file("f1").unwrap().status, FileStatus::Deleted);
        assert_eq!(h.store.activities().len(), 1);
        assert!(h
            .store
            .audit_logs()
            .iter()
            .all(|log| log.status != AuditLogStatus::Success));
    }

    #[tokio::test]
    async fn test_failure_entry_write_error_is_swallowed() {
        let h = harness();
        seed(&h);
        h.store.fail_on(FailPoint::FindIntegration);
        h.store.fail_on(FailPoint::AppendAuditLog);

        let err = h.service.delete_file(&ctx("t1"), "f1").await.unwrap_err();

        assert_eq!(err.to_string(), "Service unavailable: FindIntegration unavailable");
        assert!(h.store.audit_logs().is_empty());
    }
}
