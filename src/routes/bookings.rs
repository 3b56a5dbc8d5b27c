//! Booking routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::{RequireAdmin, RequireMember};
use crate::models::booking::{Booking, CreateBooking, UpdateBooking};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::booking as booking_service;
use crate::AppState;

/// POST /booking/register
pub async fn create(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Json(body): Json<CreateBooking>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), AppError> {
    body.validate()?;
    let booking = booking_service::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(booking, "Booking created successfully"),
    ))
}

/// GET /bookings (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<Booking>>>, AppError> {
    let result = booking_service::list(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /booking/{id} (admin)
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    let booking = booking_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(booking))
}

/// GET /bookings/customer/{id}
pub async fn list_by_customer(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Booking>>>, AppError> {
    let bookings = booking_service::list_by_customer(&state.db, customer_id).await?;
    Ok(ApiResponse::success(bookings))
}

/// PUT /booking/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBooking>,
) -> Result<Json<ApiResponse<Booking>>, AppError> {
    body.validate()?;
    let booking = booking_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::with_message(booking, "Booking updated successfully"))
}

/// DELETE /booking/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    booking_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
