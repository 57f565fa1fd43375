//! Liveness and readiness probes.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the record store answers within five seconds.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let (ready, database) = match tokio::time::timeout(TIMEOUT, state.db.files.ping()).await {
        Ok(Ok(())) => (true, "ready".to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database readiness check failed");
            (false, format!("not_ready: {}", e))
        }
        Err(_) => {
            tracing::error!("Database readiness check timed out");
            (false, "timeout".to_string())
        }
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "database": database,
        })),
    )
}
