//! Venue routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::{RequireAdmin, RequireMember};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::venue::{CreateVenue, UpdateVenue, Venue, VenueWithEvents};
use crate::services::venue as venue_service;
use crate::AppState;

/// POST /venue/register (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateVenue>,
) -> Result<(StatusCode, Json<ApiResponse<Venue>>), AppError> {
    body.validate()?;
    let venue = venue_service::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(venue, "Venue created successfully"),
    ))
}

/// GET /venues
pub async fn list(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<Venue>>>, AppError> {
    let result = venue_service::list(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /venue/{id} (admin)
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Venue>>, AppError> {
    let venue = venue_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(venue))
}

/// GET /venues-event/{id}
pub async fn with_events(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VenueWithEvents>>, AppError> {
    let venue = venue_service::find_with_events(&state.db, id).await?;
    Ok(ApiResponse::success(venue))
}

/// PUT /venue/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateVenue>,
) -> Result<Json<ApiResponse<Venue>>, AppError> {
    body.validate()?;
    let venue = venue_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::with_message(venue, "Venue updated successfully"))
}

/// DELETE /venue/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    venue_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
