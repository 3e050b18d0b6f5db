//! reqwest client for the hosted `search-gifts` and `save-gift` functions.
//!
//! Implements `RemoteGiftSearch` and `GiftSaver` from `giftafy-core`. Any
//! server speaking the `/functions/v1` contract works, including the one
//! served by the `giftafy` binary.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use giftafy_core::search::remote::{GiftSaver, RemoteGiftSearch};
use giftafy_types::error::{SaveError, SearchError};
use giftafy_types::function::{
    FunctionErrorBody, SaveGiftRequest, SaveGiftResponse, SearchGiftsRequest, SearchGiftsResponse,
};
use giftafy_types::gift::{GiftRecord, SavedGift};

const SEARCH_FUNCTION: &str = "search-gifts";
const SAVE_FUNCTION: &str = "save-gift";

/// Client for the hosted gift functions.
///
/// The bearer token is optional: searches without one are refused by the
/// server with 401, which callers treat as a fallback trigger.
pub struct HttpGiftFunctions {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<SecretString>,
}

impl HttpGiftFunctions {
    /// Build a client for the server at `base_url`.
    ///
    /// `timeout_secs` bounds each whole request; `None` keeps reqwest's
    /// defaults.
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    pub fn with_access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{name}", self.base_url)
    }

    fn post(&self, name: &str) -> reqwest::RequestBuilder {
        let request = self.client.post(self.function_url(name));
        match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

impl RemoteGiftSearch for HttpGiftFunctions {
    async fn search_gifts(
        &self,
        request: &SearchGiftsRequest,
    ) -> Result<Vec<GiftRecord>, SearchError> {
        let response = self
            .post(SEARCH_FUNCTION)
            .json(request)
            .send()
            .await
            .map_err(|e| SearchError::Transient(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = search_error_for(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), error = %err, "search-gifts refused");
            return Err(err);
        }

        let body: SearchGiftsResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Transient(format!("malformed search response: {e}")))?;
        Ok(body.gifts)
    }
}

impl GiftSaver for HttpGiftFunctions {
    async fn save_gift(&self, request: &SaveGiftRequest) -> Result<SavedGift, SaveError> {
        let response = self
            .post(SAVE_FUNCTION)
            .json(request)
            .send()
            .await
            .map_err(|e| SaveError::Failed(format!("save request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(save_error_for(status.as_u16(), &body));
        }

        let body: SaveGiftResponse = response
            .json()
            .await
            .map_err(|e| SaveError::Failed(format!("malformed save response: {e}")))?;
        Ok(body.gift)
    }
}

fn error_body(body: &str) -> Option<FunctionErrorBody> {
    serde_json::from_str(body).ok()
}

/// Map a non-2xx `search-gifts` answer to a `SearchError`.
///
/// A limit-exceeded flag wins over the status code.
pub fn search_error_for(status: u16, body: &str) -> SearchError {
    let parsed = error_body(body);
    if status == 429 || parsed.as_ref().is_some_and(FunctionErrorBody::is_limit_exceeded) {
        return SearchError::QuotaExceeded;
    }

    let message = parsed
        .map(|b| match b.details {
            Some(details) => format!("{}: {details}", b.error),
            None => b.error,
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    match status {
        401 => SearchError::AuthenticationRequired,
        404 => SearchError::NoResults,
        _ => SearchError::Transient(message),
    }
}

/// Map a non-2xx `save-gift` answer to a `SaveError`.
pub fn save_error_for(status: u16, body: &str) -> SaveError {
    let parsed = error_body(body);
    match status {
        401 => SaveError::AuthenticationRequired,
        403 if parsed.as_ref().is_some_and(FunctionErrorBody::is_upgrade_required) => {
            SaveError::CapabilityDenied
        }
        404 => SaveError::NotFound,
        _ => SaveError::Failed(
            parsed
                .map(|b| b.error)
                .unwrap_or_else(|| format!("HTTP {status}")),
        ),
    }
}
