//! Saved gift repository trait definition.

use giftafy_types::account::UserId;
use giftafy_types::error::RepositoryError;
use giftafy_types::gift::{SavedGift, SavedGiftId};

/// Repository trait for gifts saved to an account.
pub trait SavedGiftRepository: Send + Sync {
    fn create(
        &self,
        gift: &SavedGift,
    ) -> impl std::future::Future<Output = Result<SavedGift, RepositoryError>> + Send;

    fn get(
        &self,
        id: &SavedGiftId,
    ) -> impl std::future::Future<Output = Result<Option<SavedGift>, RepositoryError>> + Send;

    /// All gifts saved by a user, newest first.
    fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<SavedGift>, RepositoryError>> + Send;

    /// Set the favourite flag. `NotFound` if the gift does not exist.
    fn set_favorite(
        &self,
        id: &SavedGiftId,
        is_favorite: bool,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Permanently delete a saved gift. `NotFound` if it does not exist.
    fn delete(
        &self,
        id: &SavedGiftId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
