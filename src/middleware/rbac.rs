//! Role-based access control extractors.
//!
//! A token with the wrong role is rejected exactly like a missing one.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::customer::CustomerRole;
use crate::AppState;

/// Requires the `admin` role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != CustomerRole::Admin {
            tracing::debug!(customer_id = %user.id, "Admin route refused");
            return Err(AppError::Unauthorized);
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `admin` or `user`.
#[derive(Debug, Clone)]
pub struct RequireMember(pub CurrentUser);

impl FromRequestParts<AppState> for RequireMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        match user.role {
            CustomerRole::Admin | CustomerRole::User => Ok(RequireMember(user)),
        }
    }
}
