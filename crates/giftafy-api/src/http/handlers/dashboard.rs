//! Dashboard handlers: saved gifts, favourites, search history.

use axum::Json;
use axum::extract::{Path, Query, State};

use giftafy_core::service::gift::{Dashboard, HISTORY_LIMIT, SavedGiftLists};
use giftafy_types::gift::{SavedGift, SavedGiftId, SearchHistoryEntry};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::query::HistoryQuery;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

fn parse_gift_id(raw: &str) -> Result<SavedGiftId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid saved gift id: '{raw}'")))
}

/// GET /api/v1/dashboard - Account summary, saved gifts, recent searches.
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Dashboard>>, AppError> {
    let timer = RequestTimer::start();
    let dashboard = state.library_service.dashboard(&auth.user).await?;

    Ok(Json(
        timer
            .finish(dashboard)
            .with_link("self", "/api/v1/dashboard")
            .with_link("saved_gifts", "/api/v1/saved-gifts")
            .with_link("search_history", "/api/v1/search-history"),
    ))
}

/// GET /api/v1/saved-gifts - Saved gifts newest first, split by favourite flag.
pub async fn list_saved_gifts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<SavedGiftLists>>, AppError> {
    let timer = RequestTimer::start();
    let lists = state.library_service.list_saved(&auth.user).await?;

    Ok(Json(timer.finish(lists).with_link("self", "/api/v1/saved-gifts")))
}

/// PATCH /api/v1/saved-gifts/{id}/favorite - Flip the favourite flag.
///
/// Adding a favourite needs a tier that allows it; removing never does.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SavedGift>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_gift_id(&id)?;
    let gift = state.library_service.toggle_favorite(&auth.user, &id).await?;

    Ok(Json(timer.finish(gift).with_link("saved_gifts", "/api/v1/saved-gifts")))
}

/// DELETE /api/v1/saved-gifts/{id} - Remove one of the caller's saved gifts.
pub async fn delete_saved_gift(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    let gift_id = parse_gift_id(&id)?;
    state.library_service.delete_gift(&auth.user, &gift_id).await?;

    Ok(Json(timer.finish(serde_json::json!({ "deleted": id }))))
}

/// GET /api/v1/search-history - Most recent searches, newest first.
pub async fn list_search_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<SearchHistoryEntry>>>, AppError> {
    let timer = RequestTimer::start();
    let mut entries = state.library_service.recent_searches(&auth.user).await?;
    let limit = query.limit.unwrap_or(HISTORY_LIMIT).min(HISTORY_LIMIT) as usize;
    entries.truncate(limit);

    Ok(Json(timer.finish(entries).with_link("self", "/api/v1/search-history")))
}
