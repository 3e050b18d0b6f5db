//! Google Custom Search JSON API as an upstream gift source.

use rand_core::OsRng;
use secrecy::{ExposeSecret, SecretString};

use giftafy_core::search::remote::{UpstreamGiftSource, upstream_query};
use giftafy_core::search::web::{WebSearchResponse, gift_from_web_item};
use giftafy_types::error::SearchError;
use giftafy_types::function::SearchGiftsRequest;
use giftafy_types::gift::GiftRecord;

pub const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Web search upstream. Each result item becomes one gift record with a
/// price scraped from the snippet and synthesized popularity figures.
///
/// Does not derive Debug: the API key travels in the query string.
pub struct GoogleCustomSearch {
    client: reqwest::Client,
    api_key: SecretString,
    engine_id: String,
    endpoint: String,
}

impl GoogleCustomSearch {
    pub fn new(client: reqwest::Client, api_key: SecretString, engine_id: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            engine_id: engine_id.into(),
            endpoint: GOOGLE_SEARCH_ENDPOINT.to_string(),
        }
    }

    /// Point at a different endpoint (test servers, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Query parameters other than the key, in request order.
    fn query_params(&self, request: &SearchGiftsRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("cx", self.engine_id.clone()),
            ("q", upstream_query(request)),
        ];
        // Both bounds present: ask for pages that actually mention a price.
        if request.min_price.is_some() && request.max_price.is_some() {
            params.push(("exactTerms", "price".to_string()));
        }
        params
    }
}

impl UpstreamGiftSource for GoogleCustomSearch {
    fn name(&self) -> &str {
        "google"
    }

    async fn fetch_gifts(&self, request: &SearchGiftsRequest) -> Result<Vec<GiftRecord>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.expose_secret())])
            .query(&self.query_params(request))
            .send()
            .await
            .map_err(|e| SearchError::Upstream(format!("google search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "google search returned an error");
            return Err(SearchError::Upstream(format!(
                "google search returned {status}: {body}"
            )));
        }

        let data: WebSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Upstream(format!("malformed google response: {e}")))?;

        let mut rng = OsRng;
        Ok(data
            .items
            .iter()
            .map(|item| gift_from_web_item(item, &mut rng))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GoogleCustomSearch {
        GoogleCustomSearch::new(
            reqwest::Client::new(),
            SecretString::from("test-key"),
            "engine-123",
        )
    }

    #[test]
    fn test_query_params_append_gift_ideas() {
        let request = SearchGiftsRequest {
            search_terms: "Birthday gift for Friend".to_string(),
            min_price: None,
            max_price: Some(25.0),
        };
        let params = source().query_params(&request);
        assert_eq!(
            params,
            vec![
                ("cx", "engine-123".to_string()),
                ("q", "Birthday gift for Friend gift ideas".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_with_both_bounds_require_price() {
        let request = SearchGiftsRequest {
            search_terms: "Wedding".to_string(),
            min_price: Some(50.0),
            max_price: Some(100.0),
        };
        let params = source().query_params(&request);
        assert!(params.contains(&("exactTerms", "price".to_string())));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_upstream_error() {
        let google = source().with_endpoint("http://127.0.0.1:9/customsearch/v1");
        let err = google
            .fetch_gifts(&SearchGiftsRequest {
                search_terms: "x".to_string(),
                min_price: None,
                max_price: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Upstream(_)));
    }
}
