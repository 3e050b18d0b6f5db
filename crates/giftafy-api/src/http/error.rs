//! Error types mapping to HTTP status codes.
//!
//! [`AppError`] renders the envelope format used by `/api/v1` and `/auth/v1`.
//! [`FunctionError`] renders the flat `{error, ...}` body of the hosted
//! functions under `/functions/v1`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use giftafy_types::error::{AccountError, SaveError, SearchError};
use giftafy_types::function::FunctionErrorBody;

/// Application-level error for envelope endpoints.
#[derive(Debug)]
pub enum AppError {
    Account(AccountError),
    Save(SaveError),
    Unauthorized(String),
    Validation(String),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<SaveError> for AppError {
    fn from(e: SaveError) -> Self {
        AppError::Save(e)
    }
}

impl AppError {
    /// Status, machine-readable code, and message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Account(e @ AccountError::InvalidEmail)
            | AppError::Account(e @ AccountError::WeakPassword(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Account(e @ AccountError::EmailTaken) => {
                (StatusCode::CONFLICT, "EMAIL_TAKEN", e.to_string())
            }
            AppError::Account(e @ AccountError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", e.to_string())
            }
            AppError::Account(e @ AccountError::SessionExpired) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
            }
            AppError::Account(e @ AccountError::NotFound) => {
                (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND", e.to_string())
            }
            AppError::Account(e) => (StatusCode::INTERNAL_SERVER_ERROR, "ACCOUNT_ERROR", e.to_string()),
            AppError::Save(e @ SaveError::AuthenticationRequired) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
            }
            AppError::Save(e @ SaveError::CapabilityDenied) => {
                (StatusCode::FORBIDDEN, "UPGRADE_REQUIRED", e.to_string())
            }
            AppError::Save(e @ SaveError::NotFound) => {
                (StatusCode::NOT_FOUND, "GIFT_NOT_FOUND", e.to_string())
            }
            AppError::Save(e) => (StatusCode::INTERNAL_SERVER_ERROR, "SAVE_ERROR", e.to_string()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (status, Json(body)).into_response()
    }
}

/// Error for the hosted functions.
#[derive(Debug)]
pub enum FunctionError {
    MissingAuthorization,
    Unauthorized,
    Search(SearchError),
    Save(SaveError),
}

impl From<SearchError> for FunctionError {
    fn from(e: SearchError) -> Self {
        FunctionError::Search(e)
    }
}

impl From<SaveError> for FunctionError {
    fn from(e: SaveError) -> Self {
        FunctionError::Save(e)
    }
}

impl FunctionError {
    pub fn parts(&self) -> (StatusCode, FunctionErrorBody) {
        match self {
            FunctionError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                FunctionErrorBody::new("No authorization header"),
            ),
            FunctionError::Unauthorized
            | FunctionError::Search(SearchError::AuthenticationRequired)
            | FunctionError::Save(SaveError::AuthenticationRequired) => {
                (StatusCode::UNAUTHORIZED, FunctionErrorBody::new("Unauthorized"))
            }
            FunctionError::Search(SearchError::QuotaExceeded) => (
                StatusCode::TOO_MANY_REQUESTS,
                FunctionErrorBody {
                    limit_exceeded: Some(true),
                    ..FunctionErrorBody::new("Daily search limit exceeded")
                },
            ),
            FunctionError::Search(SearchError::NoResults) => {
                (StatusCode::NOT_FOUND, FunctionErrorBody::new("No results found"))
            }
            FunctionError::Search(SearchError::Upstream(details))
            | FunctionError::Search(SearchError::Transient(details)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                FunctionErrorBody {
                    details: Some(details.clone()),
                    ..FunctionErrorBody::new("Search provider unavailable")
                },
            ),
            FunctionError::Search(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                FunctionErrorBody {
                    details: Some(e.to_string()),
                    ..FunctionErrorBody::new("Internal server error")
                },
            ),
            FunctionError::Save(SaveError::CapabilityDenied) => (
                StatusCode::FORBIDDEN,
                FunctionErrorBody {
                    upgrade_required: Some(true),
                    ..FunctionErrorBody::new("Your subscription tier does not allow favoriting gifts")
                },
            ),
            FunctionError::Save(SaveError::NotFound) => {
                (StatusCode::NOT_FOUND, FunctionErrorBody::new("Saved gift not found"))
            }
            FunctionError::Save(SaveError::Failed(details)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                FunctionErrorBody {
                    details: Some(details.clone()),
                    ..FunctionErrorBody::new("Failed to save gift")
                },
            ),
        }
    }
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %body.error, details = ?body.details, "function failed");
        }
        (status, Json(body)).into_response()
    }
}
