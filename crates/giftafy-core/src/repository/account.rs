//! Account and session repository trait definitions.

use chrono::{DateTime, Utc};

use giftafy_types::account::{SearchUsage, SessionRecord, SubscriptionTier, User, UserId};
use giftafy_types::error::RepositoryError;

/// Repository trait for account persistence.
///
/// Implementations live in giftafy-infra (e.g., SqliteAccountRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait AccountRepository: Send + Sync {
    /// Create a new account. Fails with `Conflict` if the email is taken.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_user(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up an account by its (lowercased) email.
    fn get_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Charge one search against `daily_limit` as a single atomic step (see
    /// [`crate::service::quota::charge`]). The counter restarts when `now`
    /// falls on a different UTC day than the stored reset.
    ///
    /// Returns the new usage, or `None` when the limit is already reached or
    /// the account does not exist.
    fn charge_search(
        &self,
        id: &UserId,
        daily_limit: u32,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<SearchUsage>, RepositoryError>> + Send;

    /// Change an account's subscription tier.
    fn set_tier(
        &self,
        id: &UserId,
        tier: SubscriptionTier,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Repository trait for login sessions. Only token hashes are stored.
pub trait SessionRepository: Send + Sync {
    fn create_session(
        &self,
        session: &SessionRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_session(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<SessionRecord>, RepositoryError>> + Send;

    /// Delete a session. Deleting an unknown session is not an error.
    fn delete_session(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove sessions that expired at or before `now`. Returns how many.
    fn delete_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
