//! Global configuration types for Giftafy.
//!
//! `GiftafyConfig` represents the top-level `config.toml` that is injected at
//! startup: search credentials, the catalog source, the upstream provider used
//! by the hosted search function, the remote endpoint used by the client, and
//! server settings.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration. Loaded from `~/.giftafy/config.toml`; every field
/// has a default.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GiftafyConfig {
    /// Key for the upstream search API (Google Custom Search or the
    /// OpenAI-compatible endpoint). `GIFTAFY_SEARCH_API_KEY` overrides it.
    #[serde(default)]
    pub search_api_key: Option<String>,

    /// Where the local gift catalog comes from.
    #[serde(default)]
    pub catalog_source: CatalogSource,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

// Hand-written so the API key never reaches logs.
impl fmt::Debug for GiftafyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiftafyConfig")
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("catalog_source", &self.catalog_source)
            .field("upstream", &self.upstream)
            .field("remote", &self.remote)
            .field("search", &self.search)
            .field("server", &self.server)
            .finish()
    }
}

/// Source of the baseline gift catalog.
///
/// In TOML: `catalog_source = "builtin"` or `catalog_source = { file = "gifts.json" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    #[default]
    Builtin,
    File(PathBuf),
}

/// Third-party source queried by the hosted search function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamProvider {
    /// Serve the local catalog matcher.
    #[default]
    None,
    /// Google Custom Search JSON API.
    Google,
    /// Any OpenAI-compatible chat completion endpoint, parsed from free text.
    OpenaiCompatible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub provider: UpstreamProvider,
    /// Google programmable search engine id (`cx`).
    #[serde(default)]
    pub search_engine_id: Option<String>,
    /// Base URL override for the upstream API.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model name for the OpenAI-compatible provider.
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            provider: UpstreamProvider::default(),
            search_engine_id: None,
            base_url: None,
            model: default_model(),
        }
    }
}

/// Client-side settings for reaching the hosted functions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of a server exposing `/functions/v1/*`. Unset means the
    /// client searches the local catalog only.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout. Unset keeps the HTTP client's default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Artificial delay before local catalog results are returned.
    #[serde(default)]
    pub local_latency_ms: u64,
    /// Truncate result sets handed to the results view.
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl_hours() -> u32 {
    168
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}
