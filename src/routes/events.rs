//! Event routes. Listing and lookup are public.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::event as event_service;
use crate::AppState;

/// POST /event/register (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateEvent>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>), AppError> {
    body.validate()?;
    let event = event_service::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(event, "Event created successfully"),
    ))
}

/// GET /events
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<Event>>>, AppError> {
    let result = event_service::list(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /event/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = event_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(event))
}

/// PUT /event/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEvent>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    body.validate()?;
    let event = event_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::with_message(event, "Event updated successfully"))
}

/// DELETE /event/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    event_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
