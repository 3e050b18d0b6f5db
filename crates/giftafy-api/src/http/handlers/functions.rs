//! The hosted gift functions: `search-gifts` and `save-gift`.
//!
//! Flat JSON bodies (no envelope) so any client of the original function
//! contract can talk to this server.

use axum::Json;
use axum::extract::State;
use tracing::Instrument;

use giftafy_observe::attrs::{GIFTAFY_SEARCH_RESULT_COUNT, GIFTAFY_USER_TIER};
use giftafy_types::function::{
    SaveGiftRequest, SaveGiftResponse, SearchGiftsRequest, SearchGiftsResponse,
};

use crate::http::error::FunctionError;
use crate::http::extractors::auth::FunctionUser;
use crate::state::AppState;

/// POST /functions/v1/search-gifts - Quota-checked upstream search.
pub async fn search_gifts(
    State(state): State<AppState>,
    FunctionUser(user): FunctionUser,
    Json(request): Json<SearchGiftsRequest>,
) -> Result<Json<SearchGiftsResponse>, FunctionError> {
    let span = tracing::info_span!(
        "giftafy.function",
        giftafy.function.name = "search-gifts",
        giftafy.user.id = %user.id,
        giftafy.user.tier = tracing::field::Empty,
        giftafy.upstream.name = state.hosted_search.upstream_name(),
        giftafy.search.result_count = tracing::field::Empty,
    );
    span.record(GIFTAFY_USER_TIER, user.subscription_tier.to_string().as_str());

    let gifts = state
        .hosted_search
        .search_gifts(&user, &request)
        .instrument(span.clone())
        .await?;

    span.record(GIFTAFY_SEARCH_RESULT_COUNT, gifts.len());
    Ok(Json(SearchGiftsResponse { gifts }))
}

/// POST /functions/v1/save-gift - Save a gift snapshot to the account.
pub async fn save_gift(
    State(state): State<AppState>,
    FunctionUser(user): FunctionUser,
    Json(request): Json<SaveGiftRequest>,
) -> Result<Json<SaveGiftResponse>, FunctionError> {
    let span = tracing::info_span!(
        "giftafy.function",
        giftafy.function.name = "save-gift",
        giftafy.user.id = %user.id,
        is_favorite = request.is_favorite,
    );

    let gift = state
        .library_service
        .save_gift(&user, request)
        .instrument(span)
        .await?;

    Ok(Json(SaveGiftResponse {
        success: true,
        gift,
    }))
}
