//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use clutterscore_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clutterscore API",
        version = "0.1.0",
        description = "Workspace cleanup API: file explorer, audit trail, integrations and best-effort deletion of files on connected platforms."
    ),
    paths(
        handlers::files::delete_file,
        handlers::files::list_files,
        handlers::audit_logs::list_audit_logs,
        handlers::integrations::list_integrations,
        handlers::integrations::disconnect_integration,
        handlers::integrations::refresh_integration_token,
    ),
    components(
        schemas(
            models::ToolSource,
            models::FileStatus,
            models::FileResponse,
            models::FileListResponse,
            models::DeleteFileResponse,
            models::AuditLogStatus,
            models::AuditLogResponse,
            models::AuditLogListResponse,
            models::IntegrationSummary,
            models::IntegrationListResponse,
            models::IntegrationSourceRequest,
            models::IntegrationActionResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "files", description = "File explorer and deletion"),
        (name = "audit-logs", description = "Compliance audit trail"),
        (name = "integrations", description = "Connected platforms")
    )
)]
pub struct ApiDoc;
