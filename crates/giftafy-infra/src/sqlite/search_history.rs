//! SQLite search history repository.

use giftafy_core::repository::search_history::SearchHistoryRepository;
use giftafy_types::account::UserId;
use giftafy_types::error::RepositoryError;
use giftafy_types::gift::SearchHistoryEntry;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

#[derive(Clone)]
pub struct SqliteSearchHistoryRepository {
    pool: DatabasePool,
}

impl SqliteSearchHistoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SearchHistoryEntry, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let user_id: String = row.try_get("user_id").map_err(query_error)?;
    let search_terms: String = row.try_get("search_terms").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(SearchHistoryEntry {
        id: Uuid::parse_str(&id)
            .map_err(|e| RepositoryError::Query(format!("invalid history id: {e}")))?,
        user_id: user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?,
        search_terms,
        created_at: parse_datetime(&created_at)?,
    })
}

impl SearchHistoryRepository for SqliteSearchHistoryRepository {
    async fn append(&self, entry: &SearchHistoryEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO search_history (id, user_id, search_terms, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(&entry.search_terms)
        .bind(format_datetime(&entry.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<SearchHistoryEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM search_history WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(entry_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::account::SqliteAccountRepository;
    use crate::sqlite::testing::test_pool;
    use chrono::{Duration, Utc};
    use giftafy_core::repository::account::AccountRepository;
    use giftafy_types::account::{SubscriptionTier, User};

    #[tokio::test]
    async fn test_append_and_list_recent() {
        let pool = test_pool().await;
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: "history@example.com".to_string(),
            password_hash: "hash".to_string(),
            subscription_tier: SubscriptionTier::Free,
            search_count: 0,
            last_search_reset: now,
            created_at: now,
        };
        SqliteAccountRepository::new(pool.clone())
            .create_user(&user)
            .await
            .unwrap();
        let repo = SqliteSearchHistoryRepository::new(pool);

        for (i, terms) in ["first", "second", "third"].iter().enumerate() {
            repo.append(&SearchHistoryEntry {
                id: Uuid::now_v7(),
                user_id: user.id,
                search_terms: terms.to_string(),
                created_at: now + Duration::seconds(i as i64),
            })
            .await
            .unwrap();
        }

        let recent = repo.list_recent(&user.id, 2).await.unwrap();
        let terms: Vec<&str> = recent.iter().map(|e| e.search_terms.as_str()).collect();
        assert_eq!(terms, vec!["third", "second"]);

        assert!(repo.list_recent(&UserId::new(), 10).await.unwrap().is_empty());
    }
}
