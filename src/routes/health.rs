//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub smtp: bool,
    pub mpesa: bool,
}

/// Liveness probe.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: the database must answer. Mail and M-Pesa are reported
/// but do not affect readiness.
pub async fn ready(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    let (status, database) = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (StatusCode::OK, "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, format!("error: {e}"))
        }
    };

    (
        status,
        ApiResponse::success(HealthStatus {
            status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
            database,
            smtp: state.mailer.is_enabled(),
            mpesa: state.mpesa.is_configured(),
        }),
    )
}
