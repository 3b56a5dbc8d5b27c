//! Admin analytics route.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::services::analytics::{self as analytics_service, AnalyticsReport};
use crate::AppState;

/// GET /analytics (admin)
pub async fn get_analytics(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<AnalyticsReport>>, AppError> {
    let report = analytics_service::compute_analytics(state.analytics.as_ref()).await?;
    Ok(ApiResponse::with_message(
        report,
        "Analytics data retrieved successfully",
    ))
}
