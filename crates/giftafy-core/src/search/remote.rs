//! Ports for reaching the hosted gift functions and upstream search sources.
//!
//! Implementations live in giftafy-infra (reqwest for the hosted functions,
//! Google Custom Search and OpenAI-compatible endpoints for upstreams).
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use giftafy_types::error::{SaveError, SearchError};
use giftafy_types::function::{SaveGiftRequest, SearchGiftsRequest};
use giftafy_types::gift::{GiftRecord, SavedGift};

/// Client side of the hosted `search-gifts` function.
pub trait RemoteGiftSearch: Send + Sync {
    /// Search remotely. A limit-exceeded answer must surface as
    /// `SearchError::QuotaExceeded` so callers can skip the fallback.
    fn search_gifts(
        &self,
        request: &SearchGiftsRequest,
    ) -> impl std::future::Future<Output = Result<Vec<GiftRecord>, SearchError>> + Send;
}

/// Client side of the hosted `save-gift` function.
pub trait GiftSaver: Send + Sync {
    /// Save a gift to the signed-in account. A missing session maps to
    /// `AuthenticationRequired`, a tier refusal to `CapabilityDenied`.
    fn save_gift(
        &self,
        request: &SaveGiftRequest,
    ) -> impl std::future::Future<Output = Result<SavedGift, SaveError>> + Send;
}

/// Third-party source queried by the hosted search function.
pub trait UpstreamGiftSource: Send + Sync {
    /// Short name for logs ("google", "openai_compatible", "catalog").
    fn name(&self) -> &str;

    /// Fetch candidate gifts. Budget filtering is left to the caller; a
    /// source may use the bounds as a hint.
    fn fetch_gifts(
        &self,
        request: &SearchGiftsRequest,
    ) -> impl std::future::Future<Output = Result<Vec<GiftRecord>, SearchError>> + Send;
}

/// Suffix appended to the search terms for web and LLM upstreams.
pub const UPSTREAM_QUERY_SUFFIX: &str = " gift ideas";

/// The query string sent to a web or LLM upstream.
pub fn upstream_query(request: &SearchGiftsRequest) -> String {
    format!("{}{UPSTREAM_QUERY_SUFFIX}", request.search_terms)
}
