//! SQLite subscription limits repository (read-only, seeded by migration).

use giftafy_core::repository::subscription::SubscriptionRepository;
use giftafy_types::account::{SubscriptionLimits, SubscriptionTier};
use giftafy_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::query_error;

#[derive(Clone)]
pub struct SqliteSubscriptionRepository {
    pool: DatabasePool,
}

impl SqliteSubscriptionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn limits_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SubscriptionLimits, RepositoryError> {
    let tier: String = row.try_get("tier").map_err(query_error)?;
    let daily_searches: i64 = row.try_get("daily_searches").map_err(query_error)?;
    let can_favorite_gifts: bool = row.try_get("can_favorite_gifts").map_err(query_error)?;

    Ok(SubscriptionLimits {
        tier: tier
            .parse::<SubscriptionTier>()
            .map_err(RepositoryError::Query)?,
        daily_searches: u32::try_from(daily_searches).unwrap_or(0),
        can_favorite_gifts,
    })
}

impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn get_limits(
        &self,
        tier: SubscriptionTier,
    ) -> Result<Option<SubscriptionLimits>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM subscription_limits WHERE tier = ?")
            .bind(tier.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(limits_from_row).transpose()
    }

    async fn list_limits(&self) -> Result<Vec<SubscriptionLimits>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM subscription_limits ORDER BY daily_searches")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter().map(limits_from_row).collect()
    }
}
