use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use clutterscore_core::models::{
    IntegrationActionResponse, IntegrationListResponse, IntegrationSourceRequest,
    IntegrationSummary,
};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/integrations",
    tag = "integrations",
    responses(
        (status = 200, description = "Connected platforms, without token material", body = IntegrationListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, tenant_ctx),
    fields(tenant_id = %tenant_ctx.tenant_id, operation = "list_integrations")
)]
pub async fn list_integrations(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
) -> Result<Json<IntegrationListResponse>, HttpAppError> {
    let integrations = state
        .db
        .integrations
        .list_for_tenant(&tenant_ctx.tenant_id)
        .await?;

    Ok(Json(IntegrationListResponse {
        integrations: integrations
            .into_iter()
            .map(IntegrationSummary::from)
            .collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/integrations/disconnect",
    tag = "integrations",
    request_body = IntegrationSourceRequest,
    responses(
        (status = 200, description = "Integration marked inactive", body = IntegrationActionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No integration for this platform", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, tenant_ctx, request),
    fields(tenant_id = %tenant_ctx.tenant_id, source = %request.source, operation = "disconnect_integration")
)]
pub async fn disconnect_integration(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
    Json(request): Json<IntegrationSourceRequest>,
) -> Result<Json<IntegrationActionResponse>, HttpAppError> {
    let response = state
        .integration_service
        .disconnect(&tenant_ctx, request.source)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/integrations/refresh-token",
    tag = "integrations",
    request_body = IntegrationSourceRequest,
    responses(
        (status = 200, description = "Access token refreshed and stored", body = IntegrationActionResponse),
        (status = 400, description = "Platform tokens cannot be refreshed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No active integration for this platform", body = ErrorResponse),
        (status = 500, description = "Refresh failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, tenant_ctx, request),
    fields(tenant_id = %tenant_ctx.tenant_id, source = %request.source, operation = "refresh_integration_token")
)]
pub async fn refresh_integration_token(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
    Json(request): Json<IntegrationSourceRequest>,
) -> Result<Json<IntegrationActionResponse>, HttpAppError> {
    let response = state
        .integration_service
        .refresh_token(&tenant_ctx, request.source)
        .await?;
    Ok(Json(response))
}
