//! Integration management
//!
//! Disconnecting a platform keeps the integration row and marks it inactive.
//! A token refresh runs the platform's refresh-token grant on demand and
//! stores the rotated credentials.

use std::sync::Arc;
use std::time::Duration;

use clutterscore_connectors::{ConnectorCredentials, ConnectorError, ConnectorFactory};
use clutterscore_core::models::{
    user_executor, AuditLogStatus, Integration, IntegrationActionResponse, NewAuditLog,
    TokenUpdate, ToolSource, DISCONNECT_INTEGRATION_ACTION, INTEGRATION_TARGET_TYPE,
    REFRESH_TOKEN_ACTION,
};
use clutterscore_core::AppError;
use clutterscore_db::{AuditLogStore, IntegrationStore};
use serde_json::json;

use crate::auth::models::TenantContext;
use crate::middleware::audit;
use crate::state::DbState;

pub const INTEGRATION_NOT_FOUND: &str = "Integration not found";

#[derive(Clone)]
pub struct IntegrationService {
    integrations: Arc<dyn IntegrationStore>,
    audit_logs: Arc<dyn AuditLogStore>,
    connectors: Arc<dyn ConnectorFactory>,
    connector_timeout: Duration,
}

impl IntegrationService {
    pub fn new(
        db: &DbState,
        connectors: Arc<dyn ConnectorFactory>,
        connector_timeout: Duration,
    ) -> Self {
        Self {
            integrations: db.integrations.clone(),
            audit_logs: db.audit_logs.clone(),
            connectors,
            connector_timeout,
        }
    }

    #[tracing::instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id, source = %source))]
    pub async fn disconnect(
        &self,
        ctx: &TenantContext,
        source: ToolSource,
    ) -> Result<IntegrationActionResponse, AppError> {
        let integration = self
            .integrations
            .deactivate(&ctx.tenant_id, source)
            .await?
            .ok_or_else(|| AppError::NotFound(INTEGRATION_NOT_FOUND.to_string()))?;

        self.audit_logs
            .append(self.entry(
                ctx,
                DISCONNECT_INTEGRATION_ACTION,
                source,
                AuditLogStatus::Success,
                json!({ "source": source }),
            ))
            .await?;
        audit::log_integration_disconnected(&ctx.tenant_id, &ctx.user_id, source.as_str());

        Ok(IntegrationActionResponse {
            success: true,
            message: format!("Disconnected from {}", source),
            integration: integration.into(),
        })
    }

    /// Refresh the access token of the tenant's active integration for
    /// `source`. A failure after the lookup is recorded as a FAILURE entry.
    #[tracing::instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id, source = %source))]
    pub async fn refresh_token(
        &self,
        ctx: &TenantContext,
        source: ToolSource,
    ) -> Result<IntegrationActionResponse, AppError> {
        let integration = self
            .integrations
            .find_by_source(&ctx.tenant_id, source)
            .await?
            .filter(|integration| integration.is_active)
            .ok_or_else(|| AppError::NotFound(INTEGRATION_NOT_FOUND.to_string()))?;

        match self.rotate(ctx, integration).await {
            Ok(response) => Ok(response),
            Err(err) => {
                let message = match &err {
                    AppError::OperationFailed(message) | AppError::BadRequest(message) => {
                        message.clone()
                    }
                    other => other.to_string(),
                };
                tracing::warn!(error = %message, "Integration token refresh failed");
                audit::log_integration_token_refresh(
                    &ctx.tenant_id,
                    &ctx.user_id,
                    source.as_str(),
                    Some(&message),
                );

                let entry = self.entry(
                    ctx,
                    REFRESH_TOKEN_ACTION,
                    source,
                    AuditLogStatus::Failure,
                    json!({ "source": source, "error": message }),
                );
                if let Err(append_err) = self.audit_logs.append(entry).await {
                    tracing::error!(error = %append_err, "Failed to write failure audit log entry");
                }
                Err(err)
            }
        }
    }

    async fn rotate(
        &self,
        ctx: &TenantContext,
        integration: Integration,
    ) -> Result<IntegrationActionResponse, AppError> {
        let source = integration.source;
        let connector = self.connectors.connector_for(source);
        let mut credentials = ConnectorCredentials::from_integration(&integration);

        match tokio::time::timeout(
            self.connector_timeout,
            connector.refresh_credentials(&mut credentials),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err @ ConnectorError::RefreshUnavailable(_))) => {
                return Err(AppError::BadRequest(err.to_string()));
            }
            Ok(Err(err)) => return Err(AppError::OperationFailed(err.to_string())),
            Err(_) => {
                return Err(AppError::OperationFailed(format!(
                    "Token refresh on {} timed out after {}s",
                    source,
                    self.connector_timeout.as_secs()
                )));
            }
        }

        let update = TokenUpdate {
            access_token: credentials.access_token.clone(),
            refresh_token: credentials
                .refresh_token
                .clone()
                .filter(|token| integration.refresh_token.as_ref() != Some(token)),
            expires_at: credentials.expires_at,
        };
        self.integrations
            .update_tokens(&integration.id, &update)
            .await?;

        self.audit_logs
            .append(self.entry(
                ctx,
                REFRESH_TOKEN_ACTION,
                source,
                AuditLogStatus::Success,
                json!({ "source": source, "expiresAt": credentials.expires_at }),
            ))
            .await?;
        audit::log_integration_token_refresh(&ctx.tenant_id, &ctx.user_id, source.as_str(), None);

        let mut refreshed = integration;
        refreshed.expires_at = credentials.expires_at;
        Ok(IntegrationActionResponse {
            success: true,
            message: format!("Token refreshed for {}", source),
            integration: refreshed.into(),
        })
    }

    fn entry(
        &self,
        ctx: &TenantContext,
        action_type: &str,
        source: ToolSource,
        status: AuditLogStatus,
        details: serde_json::Value,
    ) -> NewAuditLog {
        NewAuditLog {
            organization_id: ctx.tenant_id.clone(),
            user_id: Some(ctx.user_id.clone()),
            action_type: action_type.to_string(),
            target: source.to_string(),
            target_type: INTEGRATION_TARGET_TYPE.to_string(),
            executor: user_executor(&ctx.email),
            status,
            details,
        }
    }
}
