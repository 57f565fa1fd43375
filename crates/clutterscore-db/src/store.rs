//! Store trait abstractions
//!
//! These traits are the interface the API layer holds onto, so handlers and
//! services can run against Postgres in production and the in-memory store
//! in tests.

use async_trait::async_trait;
use clutterscore_core::models::{
    Activity, AuditLog, AuditLogFilter, File, FileFilter, Integration, NewActivity, NewAuditLog,
    Page, TokenUpdate, ToolSource,
};
use clutterscore_core::AppError;

use crate::db::{ActivityRepository, AuditLogRepository, FileRepository, IntegrationRepository};

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> Result<(), AppError>;

    /// File by ID, only if owned by `tenant_id`
    async fn find_for_tenant(&self, tenant_id: &str, id: &str) -> Result<Option<File>, AppError>;

    /// Set status to DELETED. Returns false if no such file for the tenant.
    async fn mark_deleted(&self, tenant_id: &str, id: &str) -> Result<bool, AppError>;

    async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &FileFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<File>, AppError>;
}

#[async_trait]
pub trait IntegrationStore: Send + Sync {
    async fn find_by_source(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError>;

    /// Rotate tokens on the integration with the given ID
    async fn update_tokens(&self, id: &str, update: &TokenUpdate) -> Result<(), AppError>;

    /// Mark inactive. Returns the updated integration, or None if the tenant
    /// has none for `source`.
    async fn deactivate(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError>;

    async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Integration>, AppError>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn append(&self, activity: NewActivity) -> Result<Activity, AppError>;
}

#[async_trait]
pub trait AuditLogStore: Send + Sync {
    async fn append(&self, entry: NewAuditLog) -> Result<AuditLog, AppError>;

    async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &AuditLogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<AuditLog>, AppError>;
}

// Implementations for the Postgres repositories

#[async_trait]
impl FileStore for FileRepository {
    async fn ping(&self) -> Result<(), AppError> {
        FileRepository::ping(self).await
    }

    async fn find_for_tenant(&self, tenant_id: &str, id: &str) -> Result<Option<File>, AppError> {
        FileRepository::find_for_tenant(self, tenant_id, id).await
    }

    async fn mark_deleted(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        FileRepository::mark_deleted(self, tenant_id, id).await
    }

    async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &FileFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<File>, AppError> {
        FileRepository::list_for_tenant(self, tenant_id, filter, limit, offset).await
    }
}

#[async_trait]
impl IntegrationStore for IntegrationRepository {
    async fn find_by_source(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError> {
        IntegrationRepository::find_by_source(self, tenant_id, source).await
    }

    async fn update_tokens(&self, id: &str, update: &TokenUpdate) -> Result<(), AppError> {
        IntegrationRepository::update_tokens(self, id, update).await
    }

    async fn deactivate(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError> {
        IntegrationRepository::deactivate(self, tenant_id, source).await
    }

    async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Integration>, AppError> {
        IntegrationRepository::list_for_tenant(self, tenant_id).await
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn append(&self, activity: NewActivity) -> Result<Activity, AppError> {
        ActivityRepository::append(self, activity).await
    }
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn append(&self, entry: NewAuditLog) -> Result<AuditLog, AppError> {
        AuditLogRepository::append(self, entry).await
    }

    async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &AuditLogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<AuditLog>, AppError> {
        AuditLogRepository::list_for_tenant(self, tenant_id, filter, limit, offset).await
    }
}
