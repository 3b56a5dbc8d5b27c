//! M-Pesa STK push initiation and gateway callback.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireMember;
use crate::services::mpesa::{self as mpesa_service, StkCallbackEnvelope, StkPushRequest};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub payment_id: Option<String>,
}

/// POST /mpesa/stkpush
pub async fn stk_push(
    State(state): State<AppState>,
    RequireMember(_user): RequireMember,
    Json(body): Json<StkPushRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let (phone_number, amount, payment_id) = body.into_parts()?;
    let data = state.mpesa.stk_push(&phone_number, amount, payment_id).await?;
    Ok(ApiResponse::success(data))
}

/// POST /mpesa/callback?payment_id=…
///
/// Called by the gateway, so it carries no bearer token.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    Json(body): Json<StkCallbackEnvelope>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let payment_id: Uuid = query
        .payment_id
        .as_deref()
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| AppError::Validation("Invalid or missing payment_id".to_string()))?;

    mpesa_service::handle_callback(&state.db, payment_id, &body).await?;
    Ok(ApiResponse::message("Callback processed successfully"))
}
