//! Payment routes.

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
use crate::models::payment::{CreatePayment, Payment, UpdatePayment};
use crate::services::payment as payment_service;
use crate::AppState;

/// POST /payment/register
pub async fn create(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Json(body): Json<CreatePayment>,
) -> Result<(StatusCode, Json<ApiResponse<Payment>>), AppError> {
    body.validate()?;
    let payment = payment_service::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(payment, "Payment created successfully"),
    ))
}

/// GET /payments (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<Payment>>>, AppError> {
    let result = payment_service::list(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /payment/{id} (admin)
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let payment = payment_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(payment))
}

/// GET /payment/customer/{id}
pub async fn list_by_customer(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, AppError> {
    let payments = payment_service::list_by_customer(&state.db, customer_id).await?;
    Ok(ApiResponse::success(payments))
}

/// PUT /payment/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePayment>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    body.validate()?;
    let payment = payment_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::with_message(payment, "Payment updated successfully"))
}

/// DELETE /payment/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    payment_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
