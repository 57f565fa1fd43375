use clutterscore_core::{
    models::{Activity, NewActivity},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Append-only activity feed
#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, activity), fields(db.table = "activities", db.operation = "insert", activity.action = %activity.action))]
    pub async fn append(&self, activity: NewActivity) -> Result<Activity, AppError> {
        let row = sqlx::query_as::<Postgres, Activity>(
            r#"
            INSERT INTO activities (id, organization_id, user_id, action, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, user_id, action, metadata, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&activity.organization_id)
        .bind(&activity.user_id)
        .bind(&activity.action)
        .bind(&activity.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
