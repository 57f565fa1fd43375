use clutterscore_core::{
    models::{Integration, TokenUpdate, ToolSource},
    AppError,
};
use sqlx::{PgPool, Postgres};

const INTEGRATION_COLUMNS: &str = "id, organization_id, source, access_token, refresh_token, \
     expires_at, is_active, connected_at, last_synced_at";

/// Repository for per-tenant platform credentials
#[derive(Clone)]
pub struct IntegrationRepository {
    pool: PgPool,
}

impl IntegrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "tool_integrations", db.operation = "select"))]
    pub async fn find_by_source(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError> {
        let integration = sqlx::query_as::<Postgres, Integration>(&format!(
            "SELECT {} FROM tool_integrations WHERE organization_id = $1 AND source = $2",
            INTEGRATION_COLUMNS
        ))
        .bind(tenant_id)
        .bind(source)
        .fetch_optional(&self.pool)
        .await?;

        Ok(integration)
    }

    /// Persist rotated tokens in a single statement. A `None` refresh token
    /// keeps the stored one.
    #[tracing::instrument(skip(self, update), fields(db.table = "tool_integrations", db.operation = "update", db.record_id = %id))]
    pub async fn update_tokens(&self, id: &str, update: &TokenUpdate) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tool_integrations
            SET access_token = $2,
                refresh_token = COALESCE($3, refresh_token),
                expires_at = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.access_token)
        .bind(update.refresh_token.as_deref())
        .bind(update.expires_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Integration {} not found", id)));
        }

        Ok(())
    }

    /// Mark the tenant's integration for `source` inactive, keeping the row.
    #[tracing::instrument(skip(self), fields(db.table = "tool_integrations", db.operation = "update"))]
    pub async fn deactivate(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError> {
        let integration = sqlx::query_as::<Postgres, Integration>(&format!(
            r#"
            UPDATE tool_integrations
            SET is_active = FALSE,
                updated_at = NOW()
            WHERE organization_id = $1 AND source = $2
            RETURNING {}
            "#,
            INTEGRATION_COLUMNS
        ))
        .bind(tenant_id)
        .bind(source)
        .fetch_optional(&self.pool)
        .await?;

        Ok(integration)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tool_integrations", db.operation = "select"))]
    pub async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Integration>, AppError> {
        let integrations = sqlx::query_as::<Postgres, Integration>(&format!(
            "SELECT {} FROM tool_integrations WHERE organization_id = $1 ORDER BY connected_at ASC",
            INTEGRATION_COLUMNS
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(integrations)
    }
}
