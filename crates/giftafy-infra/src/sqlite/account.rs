//! SQLite account and session repositories.

use chrono::{DateTime, Utc};
use giftafy_core::repository::account::{AccountRepository, SessionRepository};
use giftafy_types::account::{SearchUsage, SessionRecord, SubscriptionTier, User, UserId};
use giftafy_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

/// SQLite-backed implementation of `AccountRepository`.
#[derive(Clone)]
pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    subscription_tier: String,
    search_count: i64,
    last_search_reset: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            subscription_tier: row.try_get("subscription_tier")?,
            search_count: row.try_get("search_count")?,
            last_search_reset: row.try_get("last_search_reset")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let id = self
            .id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        let subscription_tier: SubscriptionTier = self
            .subscription_tier
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            subscription_tier,
            search_count: u32::try_from(self.search_count).unwrap_or(0),
            last_search_reset: parse_datetime(&self.last_search_reset)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl SqliteAccountRepository {
    async fn fetch_one_user(
        &self,
        sql: &str,
        key: String,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(sql)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let user_row = UserRow::from_row(&row).map_err(query_error)?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, subscription_tier, search_count, last_search_reset, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.subscription_tier.to_string())
        .bind(i64::from(user.search_count))
        .bind(format_datetime(&user.last_search_reset))
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("email '{}' already registered", user.email)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_user("SELECT * FROM users WHERE id = ?", id.to_string())
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_user("SELECT * FROM users WHERE email = ?", email.to_string())
            .await
    }

    async fn charge_search(
        &self,
        id: &UserId,
        daily_limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<SearchUsage>, RepositoryError> {
        // Stored datetimes are UTC RFC 3339, so the first ten characters are the day.
        // Check and increment happen in one statement against the writer.
        let row = sqlx::query(
            r#"UPDATE users
            SET search_count = CASE WHEN substr(last_search_reset, 1, 10) = ?1
                    THEN search_count + 1 ELSE 1 END,
                last_search_reset = CASE WHEN substr(last_search_reset, 1, 10) = ?1
                    THEN last_search_reset ELSE ?2 END
            WHERE id = ?3
              AND (CASE WHEN substr(last_search_reset, 1, 10) = ?1
                    THEN search_count ELSE 0 END) < ?4
            RETURNING search_count, last_search_reset"#,
        )
        .bind(now.date_naive().to_string())
        .bind(format_datetime(&now))
        .bind(id.to_string())
        .bind(i64::from(daily_limit))
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let search_count: i64 = row.try_get("search_count").map_err(query_error)?;
        let last_search_reset: String = row.try_get("last_search_reset").map_err(query_error)?;
        Ok(Some(SearchUsage {
            search_count: u32::try_from(search_count)
                .map_err(|e| RepositoryError::Query(format!("invalid search count: {e}")))?,
            last_search_reset: parse_datetime(&last_search_reset)?,
        }))
    }

    async fn set_tier(&self, id: &UserId, tier: SubscriptionTier) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET subscription_tier = ? WHERE id = ?")
            .bind(tier.to_string())
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// SQLite-backed implementation of `SessionRepository`.
///
/// Only the SHA-256 hash of a bearer token is stored.
#[derive(Clone)]
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SessionRow {
    token_hash: String,
    user_id: String,
    created_at: String,
    expires_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            token_hash: row.try_get("token_hash")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    fn into_session(self) -> Result<SessionRecord, RepositoryError> {
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;

        Ok(SessionRecord {
            token_hash: self.token_hash,
            user_id,
            created_at: parse_datetime(&self.created_at)?,
            expires_at: parse_datetime(&self.expires_at)?,
        })
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn create_session(&self, session: &SessionRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id.to_string())
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.expires_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict("session token already exists".to_string()))
            }
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let session_row = SessionRow::from_row(&row).map_err(query_error)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        // Every timestamp is written by format_datetime in UTC, so text order is time order.
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(format_datetime(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }
}
