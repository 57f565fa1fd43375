use clutterscore_core::{
    models::{AuditLog, AuditLogFilter, NewAuditLog, Page},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::contains_pattern;

const AUDIT_LOG_COLUMNS: &str = "id, organization_id, user_id, action_type, target, target_type, \
     executor, status, details, created_at";

/// Append-only compliance audit log
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(
        skip(self, entry),
        fields(db.table = "audit_logs", db.operation = "insert", audit.action_type = %entry.action_type)
    )]
    pub async fn append(&self, entry: NewAuditLog) -> Result<AuditLog, AppError> {
        let row = sqlx::query_as::<Postgres, AuditLog>(&format!(
            r#"
            INSERT INTO audit_logs
                (id, organization_id, user_id, action_type, target, target_type, executor, status, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            AUDIT_LOG_COLUMNS
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&entry.organization_id)
        .bind(entry.user_id.as_deref())
        .bind(&entry.action_type)
        .bind(&entry.target)
        .bind(&entry.target_type)
        .bind(&entry.executor)
        .bind(entry.status)
        .bind(&entry.details)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Newest entries first
    #[tracing::instrument(skip(self), fields(db.table = "audit_logs", db.operation = "select"))]
    pub async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &AuditLogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<AuditLog>, AppError> {
        let pattern = filter.search.as_deref().map(contains_pattern);
        let predicate = "organization_id = $1 \
             AND ($2::audit_log_status IS NULL OR status = $2) \
             AND ($3::text IS NULL OR action_type ILIKE $3 OR target ILIKE $3 OR executor ILIKE $3)";

        let logs = sqlx::query_as::<Postgres, AuditLog>(&format!(
            "SELECT {} FROM audit_logs WHERE {} ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5",
            AUDIT_LOG_COLUMNS, predicate
        ))
        .bind(tenant_id)
        .bind(filter.status)
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>(&format!(
            "SELECT COUNT(*) FROM audit_logs WHERE {}",
            predicate
        ))
        .bind(tenant_id)
        .bind(filter.status)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(logs, total))
    }
}
