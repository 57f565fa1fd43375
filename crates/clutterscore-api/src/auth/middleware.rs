use crate::auth::jwt::JwtValidator;
use crate::auth::models::TenantContext;
use crate::error::HttpAppError;
use crate::middleware::audit;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use clutterscore_core::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub validator: JwtValidator,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            validator: JwtValidator::new(jwt_secret),
        }
    }
}

fn reject(message: &str) -> Response {
    audit::log_authentication_attempt(None, None, false, Some(message.to_string()));
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Resolve the caller from the bearer token and attach a [`TenantContext`].
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => return reject("Missing authorization header"),
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return reject("Invalid authorization header format");
    };

    let claims = match auth_state.validator.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            audit::log_authentication_attempt(None, None, false, Some(e.to_string()));
            return HttpAppError(e).into_response();
        }
    };

    let role = match JwtValidator::parse_role(&claims.role) {
        Ok(role) => role,
        Err(e) => {
            audit::log_authentication_attempt(
                Some(&claims.tenant_id),
                Some(&claims.sub),
                false,
                Some(e.to_string()),
            );
            return HttpAppError(e).into_response();
        }
    };

    audit::log_authentication_attempt(Some(&claims.tenant_id), Some(&claims.sub), true, None);

    request.extensions_mut().insert(TenantContext {
        tenant_id: claims.tenant_id,
        user_id: claims.sub,
        email: claims.email,
        role,
    });

    next.run(request).await
}
