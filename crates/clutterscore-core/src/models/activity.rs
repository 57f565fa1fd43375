use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FILE_DELETED_ACTION: &str = "file.deleted";

/// Operational activity feed entry. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Activity {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub action: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub organization_id: String,
    pub user_id: String,
    pub action: String,
    pub metadata: serde_json::Value,
}
