//! Authentication routes: register, verify, login, refresh, profile.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::customer::{CustomerResponse, RegisterCustomer};
use crate::services::auth::{self as auth_service, LoginResponse, TokenPair};
use crate::services::customer as customer_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterCustomer>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerResponse>>), AppError> {
    body.validate()?;
    let customer = auth_service::register(&state.db, &state.mailer, &body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(
            CustomerResponse::from(customer),
            "Customer registered. Verification code sent to email",
        ),
    ))
}

/// POST /auth/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if body.email.trim().is_empty() || body.code.trim().is_empty() {
        return Err(AppError::Validation(
            "Email and code are required".to_string(),
        ));
    }
    auth_service::verify(&state.db, &state.mailer, body.email.trim(), &body.code).await?;
    Ok(ApiResponse::message("User verified successfully"))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = auth_service::login(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
        state.config.jwt_refresh_token_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::with_message(response, "Login successful"))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPair>>, AppError> {
    let tokens = auth_service::refresh_token(
        &state.db,
        &body.refresh_token,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
        state.config.jwt_refresh_token_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(tokens))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<CustomerResponse>>, AppError> {
    let customer = customer_service::find_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(CustomerResponse::from(customer)))
}
