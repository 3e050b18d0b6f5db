//! Public gift finder: the local catalog path, no account needed.

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;

use giftafy_core::search::builder::{build_search_phrase, parse_budget};
use giftafy_core::search::catalog::{BonusGroup, CatalogItem};
use giftafy_core::search::filter::{FilterOptions, filter_and_sort};
use giftafy_types::gift::GiftRecord;
use giftafy_types::query::{BudgetRange, GiftQuery};

use crate::http::error::AppError;
use crate::http::extractors::query::FinderQuery;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FinderResults {
    pub phrase: String,
    pub budget: BudgetRange,
    pub options: FilterOptions,
    /// Matches before the projection was applied.
    pub total: usize,
    pub gifts: Vec<GiftRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub baseline: Vec<CatalogItem>,
    pub bonus_groups: Vec<BonusGroup>,
}

/// POST /api/v1/gift-finder - Match questionnaire answers against the catalog.
///
/// `?text=&price=&sort=` project the matches the same way the results view does.
pub async fn find_gifts(
    State(state): State<AppState>,
    Query(projection): Query<FinderQuery>,
    Json(query): Json<GiftQuery>,
) -> Result<Json<ApiResponse<FinderResults>>, AppError> {
    let timer = RequestTimer::start();
    let options = projection.filter_options().map_err(AppError::Validation)?;

    let phrase = build_search_phrase(&query);
    let budget = parse_budget(&query.budget_label);
    let matches = state.catalog.match_catalog(&phrase, &budget);
    let mut gifts = filter_and_sort(&matches, &options);
    if let Some(max) = state.config.search.max_results {
        gifts.truncate(max);
    }
    tracing::debug!(%phrase, matched = matches.len(), shown = gifts.len(), "gift finder");

    let results = FinderResults {
        phrase,
        budget,
        options,
        total: matches.len(),
        gifts,
    };
    Ok(Json(timer.finish(results).with_link("catalog", "/api/v1/catalog")))
}

/// GET /api/v1/catalog - The loaded catalog, baseline and bonus groups.
pub async fn get_catalog(State(state): State<AppState>) -> Json<ApiResponse<CatalogListing>> {
    let timer = RequestTimer::start();
    let listing = CatalogListing {
        baseline: state.catalog.baseline().to_vec(),
        bonus_groups: state.catalog.bonus_groups().to_vec(),
    };
    Json(timer.finish(listing).with_link("self", "/api/v1/catalog"))
}
