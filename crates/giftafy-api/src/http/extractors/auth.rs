//! Bearer session authentication.
//!
//! Reads `Authorization: Bearer <token>` and resolves it to an account
//! through the account service. Only the SHA-256 hash of the token is ever
//! looked up.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use giftafy_types::account::User;

use crate::http::error::{AppError, FunctionError};
use crate::state::AppState;

/// Signed-in account for envelope endpoints.
pub struct AuthUser {
    pub user: User,
    /// The raw bearer token, needed to end the session on logout.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "Missing session token. Provide it via 'Authorization: Bearer <token>'."
                        .to_string(),
                )
            })?
            .to_string();

        let user = state.account_service.authenticate(&token).await?;
        Ok(Self { user, token })
    }
}

/// Signed-in account for the hosted functions, rejected with their flat
/// error body.
pub struct FunctionUser(pub User);

impl FromRequestParts<AppState> for FunctionUser {
    type Rejection = FunctionError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(FunctionError::MissingAuthorization)?;

        match state.account_service.authenticate(token).await {
            Ok(user) => Ok(Self(user)),
            Err(e) => {
                tracing::debug!(error = %e, "function call with a rejected session");
                Err(FunctionError::Unauthorized)
            }
        }
    }
}

/// The token from an `Authorization: Bearer` header, if well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
