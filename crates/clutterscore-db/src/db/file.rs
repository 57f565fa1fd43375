use clutterscore_core::{
    models::{File, FileFilter, FileStatus, Page},
    AppError,
};
use sqlx::{PgPool, Postgres};

use super::contains_pattern;

const FILE_COLUMNS: &str = "f.id, f.audit_result_id, ar.organization_id, f.source, f.external_id, \
     f.name, f.path, f.mime_type, f.size_mb, f.status, f.last_accessed_at, f.created_at, f.updated_at";

/// Repository for files discovered by audits
#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip to the database, used by readiness checks
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Get a file by ID, scoped to the organization owning its audit result
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    pub async fn find_for_tenant(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<Option<File>, AppError> {
        let file = sqlx::query_as::<Postgres, File>(&format!(
            "SELECT {} FROM files f \
             JOIN audit_results ar ON ar.id = f.audit_result_id \
             WHERE ar.organization_id = $1 AND f.id = $2",
            FILE_COLUMNS
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    /// Soft delete. Returns false when the file does not belong to the tenant.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    pub async fn mark_deleted(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE files f
            SET status = $3, updated_at = NOW()
            FROM audit_results ar
            WHERE ar.id = f.audit_result_id
              AND ar.organization_id = $1
              AND f.id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(FileStatus::Deleted)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List files for a tenant, largest first
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    pub async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &FileFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<File>, AppError> {
        let pattern = filter.search.as_deref().map(contains_pattern);
        let predicate = "ar.organization_id = $1 \
             AND ($2::file_status IS NULL OR f.status = $2) \
             AND ($3::tool_source IS NULL OR f.source = $3) \
             AND ($4::text IS NULL OR f.name ILIKE $4 OR f.path ILIKE $4)";

        let files = sqlx::query_as::<Postgres, File>(&format!(
            "SELECT {} FROM files f \
             JOIN audit_results ar ON ar.id = f.audit_result_id \
             WHERE {} \
             ORDER BY f.size_mb DESC, f.id ASC \
             LIMIT $5 OFFSET $6",
            FILE_COLUMNS, predicate
        ))
        .bind(tenant_id)
        .bind(filter.status)
        .bind(filter.source)
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<Postgres, i64>(&format!(
            "SELECT COUNT(*) FROM files f \
             JOIN audit_results ar ON ar.id = f.audit_result_id \
             WHERE {}",
            predicate
        ))
        .bind(tenant_id)
        .bind(filter.status)
        .bind(filter.source)
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(files, total))
    }
}
