//! Search history repository trait definition.

use giftafy_types::account::UserId;
use giftafy_types::error::RepositoryError;
use giftafy_types::gift::SearchHistoryEntry;

/// Append-only log of the searches a user ran through the hosted function.
pub trait SearchHistoryRepository: Send + Sync {
    fn append(
        &self,
        entry: &SearchHistoryEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The `limit` most recent entries for a user, newest first.
    fn list_recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHistoryEntry>, RepositoryError>> + Send;
}
