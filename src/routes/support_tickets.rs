//! Customer support ticket routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::{RequireAdmin, RequireMember};
use crate::models::support_ticket::{
    CreateSupportTicket, SupportTicket, SupportTicketWithCustomer, TicketStatus,
    UpdateTicketStatus,
};
use crate::services::support_ticket as ticket_service;
use crate::AppState;

/// POST /ticket/register
pub async fn create(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Json(body): Json<CreateSupportTicket>,
) -> Result<(StatusCode, Json<ApiResponse<SupportTicket>>), AppError> {
    body.validate()?;
    let ticket = ticket_service::create(&state.db, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(ticket, "Support ticket created successfully"),
    ))
}

/// GET /tickets (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<SupportTicketWithCustomer>>>, AppError> {
    let tickets = ticket_service::list_all(&state.db).await?;
    Ok(ApiResponse::success(tickets))
}

/// GET /ticket/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SupportTicketWithCustomer>>, AppError> {
    let ticket = ticket_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(ticket))
}

/// GET /customer/{id}/ticket
pub async fn list_by_customer(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SupportTicket>>>, AppError> {
    let tickets = ticket_service::list_by_customer(&state.db, customer_id).await?;
    Ok(ApiResponse::success(tickets))
}

/// GET /ticket/status/{status} (admin)
pub async fn list_by_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(status): Path<String>,
) -> Result<Json<ApiResponse<Vec<SupportTicketWithCustomer>>>, AppError> {
    let status = TicketStatus::from_label(&status).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid status. Valid statuses: {}",
            TicketStatus::VALID_LABELS
        ))
    })?;
    let tickets = ticket_service::list_by_status(&state.db, status).await?;
    Ok(ApiResponse::success(tickets))
}

/// PUT /ticket/{id} (admin)
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTicketStatus>,
) -> Result<Json<ApiResponse<SupportTicket>>, AppError> {
    let ticket = ticket_service::update_status(&state.db, id, body.status).await?;
    Ok(ApiResponse::with_message(ticket, "Ticket status updated successfully"))
}

/// DELETE /ticket/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SupportTicket>>, AppError> {
    let ticket = ticket_service::delete(&state.db, id).await?;
    Ok(ApiResponse::with_message(ticket, "Ticket deleted successfully"))
}
