//! Server side of the `search-gifts` function.
//!
//! For an authenticated account: enforce the daily quota, record the search,
//! query the configured upstream source, and keep only gifts inside the
//! requested budget.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use giftafy_types::account::User;
use giftafy_types::error::{RepositoryError, SearchError};
use giftafy_types::function::SearchGiftsRequest;
use giftafy_types::gift::{GiftRecord, SearchHistoryEntry};

use crate::repository::account::AccountRepository;
use crate::repository::search_history::SearchHistoryRepository;
use crate::repository::subscription::SubscriptionRepository;
use crate::search::remote::UpstreamGiftSource;

/// Hosted search function, generic over its storage and upstream ports.
pub struct HostedSearchService<
    A: AccountRepository,
    L: SubscriptionRepository,
    H: SearchHistoryRepository,
    U: UpstreamGiftSource,
> {
    accounts: A,
    limits: L,
    history: H,
    upstream: U,
}

impl<A, L, H, U> HostedSearchService<A, L, H, U>
where
    A: AccountRepository,
    L: SubscriptionRepository,
    H: SearchHistoryRepository,
    U: UpstreamGiftSource,
{
    pub fn new(accounts: A, limits: L, history: H, upstream: U) -> Self {
        Self {
            accounts,
            limits,
            history,
            upstream,
        }
    }

    pub fn upstream_name(&self) -> &str {
        self.upstream.name()
    }

    pub async fn search_gifts(
        &self,
        user: &User,
        request: &SearchGiftsRequest,
    ) -> Result<Vec<GiftRecord>, SearchError> {
        self.search_gifts_at(user, request, Utc::now()).await
    }

    /// Run one hosted search as of `now`.
    ///
    /// The quota is charged and the history entry written before the
    /// upstream is queried, so a failed upstream call still counts.
    pub async fn search_gifts_at(
        &self,
        user: &User,
        request: &SearchGiftsRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<GiftRecord>, SearchError> {
        let limits = self
            .limits
            .get_limits(user.subscription_tier)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                SearchError::Storage(format!(
                    "no subscription limits for tier '{}'",
                    user.subscription_tier
                ))
            })?;

        let usage = self
            .accounts
            .charge_search(&user.id, limits.daily_searches, now)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                tracing::info!(
                    user_id = %user.id,
                    limit = limits.daily_searches,
                    "daily search limit reached"
                );
                SearchError::QuotaExceeded
            })?;

        self.history
            .append(&SearchHistoryEntry {
                id: Uuid::now_v7(),
                user_id: user.id,
                search_terms: request.search_terms.clone(),
                created_at: now,
            })
            .await
            .map_err(storage)?;

        tracing::info!(
            user_id = %user.id,
            upstream = self.upstream.name(),
            searches_today = usage.search_count,
            limit = limits.daily_searches,
            "hosted search"
        );

        let candidates = self.upstream.fetch_gifts(request).await.map_err(|e| {
            tracing::warn!(upstream = self.upstream.name(), error = %e, "upstream search failed");
            match e {
                SearchError::Upstream(msg) => SearchError::Upstream(msg),
                other => SearchError::Upstream(other.to_string()),
            }
        })?;

        let total = candidates.len();
        let gifts: Vec<GiftRecord> = candidates
            .into_iter()
            .filter(|g| g.price_value().is_none_or(|p| request.within_budget(p)))
            .collect();

        tracing::debug!(total, kept = gifts.len(), "applied budget to upstream results");
        if gifts.is_empty() {
            return Err(SearchError::NoResults);
        }
        Ok(gifts)
    }
}

fn storage(e: RepositoryError) -> SearchError {
    SearchError::Storage(e.to_string())
}
