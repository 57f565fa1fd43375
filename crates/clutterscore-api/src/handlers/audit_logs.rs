use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use clutterscore_core::models::{
    clamp_page, AuditLogFilter, AuditLogListResponse, AuditLogResponse, AuditLogStatus,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAuditLogsQuery {
    pub status: Option<AuditLogStatus>,
    /// Matched against action type, target and executor
    #[validate(length(max = 200))]
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/audit-logs",
    tag = "audit-logs",
    params(ListAuditLogsQuery),
    responses(
        (status = 200, description = "Compliance audit log, newest first", body = AuditLogListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, tenant_ctx, query),
    fields(tenant_id = %tenant_ctx.tenant_id, operation = "list_audit_logs")
)]
pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    query.validate()?;
    let (limit, offset) = clamp_page(query.limit, query.offset);

    let filter = AuditLogFilter {
        status: query.status,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let page = state
        .db
        .audit_logs
        .list_for_tenant(&tenant_ctx.tenant_id, &filter, limit, offset)
        .await?;

    Ok(Json(AuditLogListResponse {
        logs: page.items.into_iter().map(AuditLogResponse::from).collect(),
        total: page.total,
        limit,
        offset,
    }))
}
