//! Application state wiring all services together.
//!
//! `ClientContext` is what the client-side commands need (config and the
//! local catalog). `AppState` adds the account store and the server-side
//! services, pinned to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use giftafy_core::search::catalog::GiftCatalog;
use giftafy_core::service::account::AccountService;
use giftafy_core::service::gift::GiftLibraryService;
use giftafy_core::service::search::HostedSearchService;
use giftafy_infra::catalog::load_catalog;
use giftafy_infra::config::load_config;
use giftafy_infra::crypto::{Argon2CredentialHasher, Sha256TokenIssuer};
use giftafy_infra::filesystem::{database_url, ensure_data_dir, resolve_data_dir};
use giftafy_infra::sqlite::account::{SqliteAccountRepository, SqliteSessionRepository};
use giftafy_infra::sqlite::pool::DatabasePool;
use giftafy_infra::sqlite::saved_gift::SqliteSavedGiftRepository;
use giftafy_infra::sqlite::search_history::SqliteSearchHistoryRepository;
use giftafy_infra::sqlite::subscription::SqliteSubscriptionRepository;
use giftafy_infra::upstream::ConfiguredUpstream;
use giftafy_types::config::GiftafyConfig;

pub type ConcreteAccountService = AccountService<
    SqliteAccountRepository,
    SqliteSessionRepository,
    Argon2CredentialHasher,
    Sha256TokenIssuer,
>;

pub type ConcreteHostedSearch = HostedSearchService<
    SqliteAccountRepository,
    SqliteSubscriptionRepository,
    SqliteSearchHistoryRepository,
    ConfiguredUpstream,
>;

pub type ConcreteLibraryService = GiftLibraryService<
    SqliteSavedGiftRepository,
    SqliteSearchHistoryRepository,
    SqliteSubscriptionRepository,
>;

/// Config and catalog, loaded once per process.
#[derive(Clone)]
pub struct ClientContext {
    pub config: Arc<GiftafyConfig>,
    pub catalog: Arc<GiftCatalog>,
    pub data_dir: PathBuf,
}

impl ClientContext {
    pub async fn load() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_config(&data_dir).await;
        Self::from_config(data_dir, config).await
    }

    pub async fn from_config(data_dir: PathBuf, config: GiftafyConfig) -> anyhow::Result<Self> {
        let catalog = load_catalog(&config.catalog_source).await?;
        tracing::debug!(?config, data_dir = %data_dir.display(), "client context loaded");

        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            data_dir,
        })
    }
}

/// Shared server state holding all services.
///
/// Used by the account CLI commands and the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<ConcreteAccountService>,
    pub hosted_search: Arc<ConcreteHostedSearch>,
    pub library_service: Arc<ConcreteLibraryService>,
    pub config: Arc<GiftafyConfig>,
    pub catalog: Arc<GiftCatalog>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Open the account store in the context's data directory and wire services.
    pub async fn open(ctx: ClientContext) -> anyhow::Result<Self> {
        ensure_data_dir(&ctx.data_dir).await?;
        let db_pool = DatabasePool::new(&database_url(&ctx.data_dir)).await?;

        let account_service = AccountService::new(
            SqliteAccountRepository::new(db_pool.clone()),
            SqliteSessionRepository::new(db_pool.clone()),
            Argon2CredentialHasher::new(),
            Sha256TokenIssuer::new(),
            ctx.config.server.session_ttl_hours,
        );

        let upstream = ConfiguredUpstream::from_config(&ctx.config, ctx.catalog.clone());
        let hosted_search = HostedSearchService::new(
            SqliteAccountRepository::new(db_pool.clone()),
            SqliteSubscriptionRepository::new(db_pool.clone()),
            SqliteSearchHistoryRepository::new(db_pool.clone()),
            upstream,
        );
        tracing::info!(upstream = hosted_search.upstream_name(), "hosted search ready");

        let library_service = GiftLibraryService::new(
            SqliteSavedGiftRepository::new(db_pool.clone()),
            SqliteSearchHistoryRepository::new(db_pool.clone()),
            SqliteSubscriptionRepository::new(db_pool.clone()),
        );

        Ok(Self {
            account_service: Arc::new(account_service),
            hosted_search: Arc::new(hosted_search),
            library_service: Arc::new(library_service),
            config: ctx.config,
            catalog: ctx.catalog,
            data_dir: ctx.data_dir,
            db_pool,
        })
    }
}
