//! Route configuration and setup.

mod health;

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use clutterscore_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Build the full router: public probes and docs plus the authenticated API.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState::new(config.jwt_secret());

    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(Arc::new(auth_state), auth_middleware),
    );
    let app_state_routes = public_routes(state.clone()).merge(protected_routes);

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit,
        request_timeout_secs = config.request_timeout().as_secs(),
        "HTTP limits configured"
    );

    let app = app_state_routes
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/live", get(health::liveness_check))
        .route(
            "/ready",
            get({
                let state = state.clone();
                move || async move { health::readiness_check(state).await }
            }),
        )
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}

fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/files", get(handlers::files::list_files))
        .route("/api/files/{id}", delete(handlers::files::delete_file))
        .route(
            "/api/audit-logs",
            get(handlers::audit_logs::list_audit_logs),
        )
        .route(
            "/api/integrations",
            get(handlers::integrations::list_integrations),
        )
        .route(
            "/api/integrations/disconnect",
            post(handlers::integrations::disconnect_integration),
        )
        .route(
            "/api/integrations/refresh-token",
            post(handlers::integrations::refresh_integration_token),
        )
        .with_state(state)
}
