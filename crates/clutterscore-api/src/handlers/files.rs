use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use clutterscore_core::models::{
    clamp_page, DeleteFileResponse, FileFilter, FileListResponse, FileResponse, FileStatus,
    ToolSource,
};
use clutterscore_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::Instrument;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFilesQuery {
    pub status: Option<FileStatus>,
    pub source: Option<ToolSource>,
    /// Matched against file name and path, case-insensitive
    #[validate(length(max = 200))]
    pub search: Option<String>,
    /// Page size, 1 to 100 (default 50)
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File marked as deleted; external outcome reported in the body", body = DeleteFileResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "File or integration not found", body = ErrorResponse),
        (status = 500, description = "Deletion aborted", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, tenant_ctx),
    fields(
        tenant_id = %tenant_ctx.tenant_id,
        user_id = %tenant_ctx.user_id,
        file_id = %id,
        operation = "delete_file"
    )
)]
pub async fn delete_file(
    tenant_ctx: TenantContext,
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteFileResponse>, HttpAppError> {
    // Detached from the request future so a timeout or client disconnect
    // cannot stop a reconciliation between the remote and local steps.
    let service = state.file_deletion.clone();
    let task = tokio::spawn(
        async move { service.delete_file(&tenant_ctx, &id).await }.in_current_span(),
    );

    let response = task
        .await
        .map_err(|err| AppError::Internal(format!("File deletion task failed: {}", err)))??;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Files of the caller's organization, largest first", body = FileListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, tenant_ctx, query),
    fields(tenant_id = %tenant_ctx.tenant_id, operation = "list_files")
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
    Query(query): Query<ListFilesQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    query.validate()?;
    let (limit, offset) = clamp_page(query.limit, query.offset);

    let filter = FileFilter {
        status: query.status,
        source: query.source,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let page = state
        .db
        .files
        .list_for_tenant(&tenant_ctx.tenant_id, &filter, limit, offset)
        .await?;

    Ok(Json(FileListResponse {
        files: page.items.into_iter().map(FileResponse::from).collect(),
        total: page.total,
        limit,
        offset,
    }))
}
