//! Upstream sources behind the hosted search function.
//!
//! [`ConfiguredUpstream`] picks the source named by `upstream.provider` in
//! the config. A provider that is missing credentials degrades to the local
//! catalog with a warning instead of failing startup.

pub mod google;
pub mod openai_compat;

use std::sync::Arc;

use secrecy::SecretString;

use giftafy_core::search::catalog::GiftCatalog;
use giftafy_core::search::remote::UpstreamGiftSource;
use giftafy_core::search::service::CatalogUpstream;
use giftafy_types::config::{GiftafyConfig, UpstreamProvider};
use giftafy_types::error::SearchError;
use giftafy_types::function::SearchGiftsRequest;
use giftafy_types::gift::GiftRecord;

use self::google::GoogleCustomSearch;
use self::openai_compat::OpenAiCompatibleSource;

pub enum ConfiguredUpstream {
    Catalog(CatalogUpstream),
    Google(GoogleCustomSearch),
    OpenAi(OpenAiCompatibleSource),
}

impl ConfiguredUpstream {
    pub fn from_config(config: &GiftafyConfig, catalog: Arc<GiftCatalog>) -> Self {
        let upstream = &config.upstream;
        let api_key = config
            .search_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .map(|k| SecretString::from(k.to_string()));

        match (upstream.provider, api_key) {
            (UpstreamProvider::None, _) => Self::Catalog(CatalogUpstream::new(catalog)),
            (UpstreamProvider::Google, Some(key)) => {
                let Some(engine_id) = upstream.search_engine_id.clone() else {
                    tracing::warn!("upstream.search_engine_id is not set, serving the local catalog");
                    return Self::Catalog(CatalogUpstream::new(catalog));
                };
                let client = match http_client(config.remote.timeout_secs) {
                    Ok(client) => client,
                    Err(e) => {
                        tracing::warn!("failed to build HTTP client: {e}, serving the local catalog");
                        return Self::Catalog(CatalogUpstream::new(catalog));
                    }
                };
                let mut google = GoogleCustomSearch::new(client, key, engine_id);
                if let Some(base_url) = &upstream.base_url {
                    google = google.with_endpoint(base_url.clone());
                }
                Self::Google(google)
            }
            (UpstreamProvider::OpenaiCompatible, Some(key)) => Self::OpenAi(
                OpenAiCompatibleSource::new(&key, upstream.base_url.as_deref(), &upstream.model),
            ),
            (provider, None) => {
                tracing::warn!(
                    ?provider,
                    "search_api_key is not set, serving the local catalog"
                );
                Self::Catalog(CatalogUpstream::new(catalog))
            }
        }
    }
}

fn http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder.build()
}

impl UpstreamGiftSource for ConfiguredUpstream {
    fn name(&self) -> &str {
        match self {
            Self::Catalog(source) => source.name(),
            Self::Google(source) => source.name(),
            Self::OpenAi(source) => source.name(),
        }
    }

    async fn fetch_gifts(&self, request: &SearchGiftsRequest) -> Result<Vec<GiftRecord>, SearchError> {
        match self {
            Self::Catalog(source) => source.fetch_gifts(request).await,
            Self::Google(source) => source.fetch_gifts(request).await,
            Self::OpenAi(source) => source.fetch_gifts(request).await,
        }
    }
}
