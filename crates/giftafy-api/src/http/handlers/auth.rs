//! Account endpoints under `/auth/v1`.

use axum::Json;
use axum::extract::State;

use giftafy_types::account::{AuthSession, Credentials, User};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// POST /auth/v1/signup - Create an account and open a session.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<ApiResponse<AuthSession>>, AppError> {
    let timer = RequestTimer::start();
    let session = state.account_service.sign_up(&credentials).await?;
    tracing::info!(user_id = %session.user.id, "account created");

    Ok(Json(timer.finish(session).with_link("user", "/auth/v1/user")))
}

/// POST /auth/v1/token - Exchange email and password for a bearer token.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<ApiResponse<AuthSession>>, AppError> {
    let timer = RequestTimer::start();
    let session = state.account_service.sign_in(&credentials).await?;

    Ok(Json(
        timer
            .finish(session)
            .with_link("user", "/auth/v1/user")
            .with_link("dashboard", "/api/v1/dashboard"),
    ))
}

/// GET /auth/v1/user - The account behind the bearer token.
pub async fn current_user(auth: AuthUser) -> Json<ApiResponse<User>> {
    Json(RequestTimer::start().finish(auth.user).with_link("self", "/auth/v1/user"))
}

/// POST /auth/v1/logout - End the current session.
pub async fn sign_out(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    state.account_service.sign_out(&auth.token).await?;

    Ok(Json(timer.finish(serde_json::json!({ "signed_out": true }))))
}
