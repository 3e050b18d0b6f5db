//! Gift search with remote-first, catalog-fallback semantics.
//!
//! The hosted search function is preferred when one is configured. Any
//! failure other than a limit-exceeded signal degrades to the local catalog
//! with a non-blocking warning attached to the outcome.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use giftafy_types::error::SearchError;
use giftafy_types::function::SearchGiftsRequest;
use giftafy_types::gift::GiftRecord;
use giftafy_types::query::{BudgetRange, GiftQuery};

use super::builder::{build_search_phrase, parse_budget};
use super::catalog::GiftCatalog;
use super::generation::{SearchGeneration, SearchTicket};
use super::remote::{RemoteGiftSearch, UpstreamGiftSource};

/// Warning attached to catalog results served after a remote failure.
pub const OFFLINE_WARNING: &str =
    "Live search is unavailable right now; showing offline results from the local catalog.";

/// Warning when the remote rejected the session.
pub const SIGN_IN_WARNING: &str =
    "Sign in to search live retailers; showing offline results from the local catalog.";

/// Where a result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Remote,
    Catalog,
}

/// A completed search, stamped with the generation that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub gifts: Vec<GiftRecord>,
    pub source: ResultSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub phrase: String,
    pub budget: BudgetRange,
    pub generation: u64,
}

/// Client-side search service.
///
/// Generic over the remote port so the CLI can run with or without a hosted
/// endpoint; `remote: None` searches the catalog only.
pub struct GiftSearchService<R: RemoteGiftSearch> {
    remote: Option<R>,
    catalog: Arc<GiftCatalog>,
    generations: Arc<SearchGeneration>,
    local_latency: Duration,
    max_results: Option<usize>,
}

impl<R: RemoteGiftSearch> GiftSearchService<R> {
    pub fn new(remote: Option<R>, catalog: Arc<GiftCatalog>) -> Self {
        Self {
            remote,
            catalog,
            generations: Arc::new(SearchGeneration::new()),
            local_latency: Duration::ZERO,
            max_results: None,
        }
    }

    /// Fixed delay before catalog results are returned.
    pub fn with_local_latency(mut self, latency: Duration) -> Self {
        self.local_latency = latency;
        self
    }

    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Generation counter shared with results views.
    pub fn generations(&self) -> Arc<SearchGeneration> {
        Arc::clone(&self.generations)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Run a search for the questionnaire answers.
    ///
    /// Starts a new generation; if a newer search starts before this one
    /// finishes, this one resolves as `SearchError::Superseded`.
    pub async fn search(&self, query: &GiftQuery) -> Result<SearchOutcome, SearchError> {
        let ticket = self.generations.begin();
        let phrase = build_search_phrase(query);
        let budget = parse_budget(&query.budget_label);

        tracing::info!(
            generation = ticket.generation(),
            phrase = %phrase,
            min = ?budget.min,
            max = ?budget.max,
            "gift search started"
        );

        let mut warning = None;
        if let Some(remote) = &self.remote {
            let request = SearchGiftsRequest::new(phrase.clone(), budget);
            let result = tokio::select! {
                _ = ticket.cancelled() => return Err(SearchError::Superseded),
                result = remote.search_gifts(&request) => result,
            };

            match result {
                Ok(gifts) if !gifts.is_empty() => {
                    tracing::info!(count = gifts.len(), "remote search succeeded");
                    return Ok(self.outcome(
                        gifts,
                        ResultSource::Remote,
                        None,
                        phrase,
                        budget,
                        &ticket,
                    ));
                }
                Ok(_) => {
                    tracing::warn!("remote search returned no gifts, using local catalog");
                    warning = Some(OFFLINE_WARNING.to_string());
                }
                Err(e) if !e.allows_fallback() => {
                    tracing::warn!(error = %e, "remote search refused");
                    return Err(e);
                }
                Err(SearchError::AuthenticationRequired) => {
                    tracing::warn!("remote search rejected the session, using local catalog");
                    warning = Some(SIGN_IN_WARNING.to_string());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "remote search failed, using local catalog");
                    warning = Some(OFFLINE_WARNING.to_string());
                }
            }
        }

        if !self.local_latency.is_zero() {
            tokio::select! {
                _ = ticket.cancelled() => return Err(SearchError::Superseded),
                _ = tokio::time::sleep(self.local_latency) => {}
            }
        }
        if ticket.is_cancelled() {
            return Err(SearchError::Superseded);
        }

        let gifts = self.catalog.match_catalog(&phrase, &budget);
        Ok(self.outcome(gifts, ResultSource::Catalog, warning, phrase, budget, &ticket))
    }

    fn outcome(
        &self,
        mut gifts: Vec<GiftRecord>,
        source: ResultSource,
        warning: Option<String>,
        phrase: String,
        budget: BudgetRange,
        ticket: &SearchTicket,
    ) -> SearchOutcome {
        if let Some(max) = self.max_results {
            gifts.truncate(max);
        }
        SearchOutcome {
            gifts,
            source,
            warning,
            phrase,
            budget,
            generation: ticket.generation(),
        }
    }
}

/// Upstream that serves the local catalog, for servers without a web or
/// LLM provider configured.
#[derive(Debug, Clone)]
pub struct CatalogUpstream {
    catalog: Arc<GiftCatalog>,
}

impl CatalogUpstream {
    pub fn new(catalog: Arc<GiftCatalog>) -> Self {
        Self { catalog }
    }
}

impl UpstreamGiftSource for CatalogUpstream {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn fetch_gifts(&self, request: &SearchGiftsRequest) -> Result<Vec<GiftRecord>, SearchError> {
        let budget = BudgetRange {
            min: request.min_price.map(|p| p.floor() as u32),
            max: request.max_price.map(|p| p.ceil() as u32),
        };
        Ok(self.catalog.match_catalog(&request.search_terms, &budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A mock remote that replays a fixed answer and records requests.
    struct MockRemote {
        answer: Result<Vec<GiftRecord>, SearchError>,
        delay: Duration,
        calls: AtomicUsize,
        last_request: Mutex<Option<SearchGiftsRequest>>,
    }

    impl MockRemote {
        fn answering(answer: Result<Vec<GiftRecord>, SearchError>) -> Self {
            Self {
                answer,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl RemoteGiftSearch for MockRemote {
        async fn search_gifts(
            &self,
            request: &SearchGiftsRequest,
        ) -> Result<Vec<GiftRecord>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.answer.clone()
        }
    }

    fn remote_gift() -> GiftRecord {
        let mut gift = GiftCatalog::builtin().baseline()[0].record.clone();
        gift.title = "Remote Telescope".to_string();
        gift
    }

    fn cooking_query() -> GiftQuery {
        GiftQuery {
            interests: "cooking".to_string(),
            ..GiftQuery::default()
        }
    }

    fn service(remote: Option<MockRemote>) -> GiftSearchService<MockRemote> {
        GiftSearchService::new(remote, Arc::new(GiftCatalog::builtin()))
    }

    #[tokio::test]
    async fn test_remote_results_preferred() {
        let svc = service(Some(MockRemote::answering(Ok(vec![remote_gift()]))));
        let outcome = svc.search(&cooking_query()).await.unwrap();

        assert_eq!(outcome.source, ResultSource::Remote);
        assert!(outcome.warning.is_none());
        assert_eq!(outcome.gifts[0].title, "Remote Telescope");

        let remote = svc.remote.as_ref().unwrap();
        let request = remote.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.search_terms, "Birthday cooking gift for Friend 26-35");
        assert_eq!(request.min_price, Some(50.0));
        assert_eq!(request.max_price, Some(100.0));
    }

    #[tokio::test]
    async fn test_quota_exceeded_never_falls_back() {
        let svc = service(Some(MockRemote::answering(Err(SearchError::QuotaExceeded))));
        let err = svc.search(&cooking_query()).await.unwrap_err();
        assert_eq!(err, SearchError::QuotaExceeded);
    }

    #[tokio::test]
    async fn test_transient_failure_falls_back_with_warning() {
        let svc = service(Some(MockRemote::answering(Err(SearchError::Transient(
            "connection refused".to_string(),
        )))));
        let outcome = svc.search(&cooking_query()).await.unwrap();

        assert_eq!(outcome.source, ResultSource::Catalog);
        assert_eq!(outcome.warning.as_deref(), Some(OFFLINE_WARNING));
        assert!(outcome.gifts.iter().any(|g| g.title == "Personalized Chef's Apron"));
    }

    #[tokio::test]
    async fn test_empty_remote_falls_back() {
        let svc = service(Some(MockRemote::answering(Ok(vec![]))));
        let outcome = svc.search(&cooking_query()).await.unwrap();
        assert_eq!(outcome.source, ResultSource::Catalog);
        assert!(!outcome.gifts.is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_falls_back_with_sign_in_hint() {
        let svc = service(Some(MockRemote::answering(Err(
            SearchError::AuthenticationRequired,
        ))));
        let outcome = svc.search(&cooking_query()).await.unwrap();
        assert_eq!(outcome.source, ResultSource::Catalog);
        assert_eq!(outcome.warning.as_deref(), Some(SIGN_IN_WARNING));
    }

    #[tokio::test]
    async fn test_catalog_only_without_remote() {
        let svc = service(None).with_max_results(Some(2));
        let outcome = svc.search(&cooking_query()).await.unwrap();
        assert_eq!(outcome.source, ResultSource::Catalog);
        assert!(outcome.warning.is_none());
        assert_eq!(outcome.gifts.len(), 2);
        assert_eq!(outcome.generation, 1);
    }

    #[tokio::test]
    async fn test_newer_search_supersedes_older() {
        let remote = MockRemote::answering(Ok(vec![remote_gift()])).slow(Duration::from_millis(200));
        let svc = Arc::new(service(Some(remote)));

        let first = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.search(&cooking_query()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = svc.search(&cooking_query()).await.unwrap();

        assert_eq!(first.await.unwrap().unwrap_err(), SearchError::Superseded);
        assert_eq!(second.generation, 2);
        assert_eq!(svc.remote.as_ref().unwrap().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_catalog_upstream_applies_budget() {
        let upstream = CatalogUpstream::new(Arc::new(GiftCatalog::builtin()));
        let request = SearchGiftsRequest {
            search_terms: "gift for Friend".to_string(),
            min_price: None,
            max_price: Some(45.0),
        };
        let gifts = upstream.fetch_gifts(&request).await.unwrap();
        assert_eq!(gifts.len(), 1);
        assert_eq!(upstream.name(), "catalog");
    }
}
