use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ToolSource;

/// Lifecycle of a mirrored file. Transitions are one-way ACTIVE -> DELETED.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "file_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    Active,
    Deleted,
}

/// A file discovered on an external platform during an audit.
///
/// Files are owned by an audit result; `organization_id` is resolved through
/// that audit result and is the only tenant key a file has.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct File {
    pub id: String,
    pub audit_result_id: String,
    pub organization_id: String,
    pub source: ToolSource,
    pub external_id: Option<String>,
    pub name: String,
    pub path: Option<String>,
    pub mime_type: Option<String>,
    pub size_mb: f64,
    pub status: FileStatus,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl File {
    pub fn is_deleted(&self) -> bool {
        self.status == FileStatus::Deleted
    }
}

/// Filters for the tenant file listing.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub status: Option<FileStatus>,
    pub source: Option<ToolSource>,
    /// Case-insensitive substring matched against name and path.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: String,
    pub name: String,
    pub source: ToolSource,
    pub path: Option<String>,
    pub mime_type: Option<String>,
    pub size_mb: f64,
    pub status: FileStatus,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<File> for FileResponse {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            name: file.name,
            source: file.source,
            path: file.path,
            mime_type: file.mime_type,
            size_mb: file.size_mb,
            status: file.status,
            last_accessed_at: file.last_accessed_at,
            created_at: file.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Outcome of a file deletion request.
///
/// `success` reports the local soft delete; the external half is reported
/// separately so callers can tell a full reconciliation from a local-only one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileResponse {
    pub success: bool,
    pub message: String,
    pub external_deletion_success: bool,
    pub external_error: Option<String>,
}
