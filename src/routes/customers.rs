//! Customer administration and profile routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::{RequireAdmin, RequireMember};
use crate::models::customer::{CustomerResponse, UpdateCustomer};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::customer as customer_service;
use crate::AppState;

/// GET /customers (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<CustomerResponse>>>, AppError> {
    let result = customer_service::list(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /customer/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CustomerResponse>>, AppError> {
    let customer = customer_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(CustomerResponse::from(customer)))
}

/// PUT /customer/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCustomer>,
) -> Result<Json<ApiResponse<CustomerResponse>>, AppError> {
    body.validate()?;
    let customer = customer_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::with_message(
        CustomerResponse::from(customer),
        "Customer updated successfully",
    ))
}

/// DELETE /customer/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    customer_service::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
