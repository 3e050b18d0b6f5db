//! Saved gifts, favourites, search history and the account dashboard.
//!
//! Every operation is scoped to the calling account: gifts owned by someone
//! else are reported as not found.

use chrono::{DateTime, Utc};
use serde::Serialize;

use giftafy_types::account::{AccountSummary, SubscriptionLimits, User};
use giftafy_types::error::{RepositoryError, SaveError};
use giftafy_types::function::SaveGiftRequest;
use giftafy_types::gift::{SavedGift, SavedGiftId, SearchHistoryEntry};

use crate::repository::saved_gift::SavedGiftRepository;
use crate::repository::search_history::SearchHistoryRepository;
use crate::repository::subscription::SubscriptionRepository;
use crate::service::quota;

/// How many history entries the dashboard shows.
pub const HISTORY_LIMIT: u32 = 20;

/// An account's saved gifts, newest first, split by the favourite flag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SavedGiftLists {
    pub saved: Vec<SavedGift>,
    pub favorites: Vec<SavedGift>,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub account: AccountSummary,
    pub saved_gifts: SavedGiftLists,
    pub recent_searches: Vec<SearchHistoryEntry>,
}

/// Service for the account-gated gift library.
pub struct GiftLibraryService<G: SavedGiftRepository, H: SearchHistoryRepository, L: SubscriptionRepository> {
    gifts: G,
    history: H,
    limits: L,
}

impl<G: SavedGiftRepository, H: SearchHistoryRepository, L: SubscriptionRepository>
    GiftLibraryService<G, H, L>
{
    pub fn new(gifts: G, history: H, limits: L) -> Self {
        Self {
            gifts,
            history,
            limits,
        }
    }

    /// Save a gift snapshot. Saving straight into favourites needs a tier
    /// that can favourite gifts.
    pub async fn save_gift(&self, user: &User, request: SaveGiftRequest) -> Result<SavedGift, SaveError> {
        if request.is_favorite {
            self.require_favorites(user).await?;
        }

        let saved = SavedGift {
            id: SavedGiftId::new(),
            user_id: user.id,
            gift: request.gift,
            is_favorite: request.is_favorite,
            created_at: Utc::now(),
        };
        let saved = self.gifts.create(&saved).await.map_err(failed)?;

        tracing::info!(
            user_id = %user.id,
            gift_id = %saved.id,
            is_favorite = saved.is_favorite,
            "gift saved"
        );
        Ok(saved)
    }

    pub async fn list_saved(&self, user: &User) -> Result<SavedGiftLists, SaveError> {
        let all = self.gifts.list_for_user(&user.id).await.map_err(failed)?;
        let (favorites, saved) = all.into_iter().partition(|g| g.is_favorite);
        Ok(SavedGiftLists { saved, favorites })
    }

    /// Flip the favourite flag. Only adding a favourite is tier-gated;
    /// removing one is always allowed.
    pub async fn toggle_favorite(&self, user: &User, id: &SavedGiftId) -> Result<SavedGift, SaveError> {
        let mut gift = self.owned(user, id).await?;
        let adding = !gift.is_favorite;
        if adding {
            self.require_favorites(user).await?;
        }

        self.gifts
            .set_favorite(id, adding)
            .await
            .map_err(not_found_or_failed)?;
        gift.is_favorite = adding;

        tracing::info!(user_id = %user.id, gift_id = %id, is_favorite = adding, "favorite toggled");
        Ok(gift)
    }

    pub async fn delete_gift(&self, user: &User, id: &SavedGiftId) -> Result<(), SaveError> {
        self.owned(user, id).await?;
        self.gifts.delete(id).await.map_err(not_found_or_failed)?;
        tracing::info!(user_id = %user.id, gift_id = %id, "saved gift deleted");
        Ok(())
    }

    /// The most recent searches, newest first.
    pub async fn recent_searches(&self, user: &User) -> Result<Vec<SearchHistoryEntry>, SaveError> {
        self.history
            .list_recent(&user.id, HISTORY_LIMIT)
            .await
            .map_err(failed)
    }

    /// Tier and today's usage.
    pub async fn summary(&self, user: &User, now: DateTime<Utc>) -> Result<AccountSummary, SaveError> {
        let limits = self.limits_for(user).await?;
        Ok(AccountSummary {
            email: user.email.clone(),
            subscription_tier: user.subscription_tier,
            search_count: quota::searches_today(user, now),
            daily_searches: limits.daily_searches,
            can_favorite_gifts: limits.can_favorite_gifts,
        })
    }

    pub async fn dashboard(&self, user: &User) -> Result<Dashboard, SaveError> {
        Ok(Dashboard {
            account: self.summary(user, Utc::now()).await?,
            saved_gifts: self.list_saved(user).await?,
            recent_searches: self.recent_searches(user).await?,
        })
    }

    async fn owned(&self, user: &User, id: &SavedGiftId) -> Result<SavedGift, SaveError> {
        match self.gifts.get(id).await.map_err(failed)? {
            Some(gift) if gift.user_id == user.id => Ok(gift),
            Some(_) => {
                tracing::warn!(user_id = %user.id, gift_id = %id, "access to another account's gift");
                Err(SaveError::NotFound)
            }
            None => Err(SaveError::NotFound),
        }
    }

    async fn limits_for(&self, user: &User) -> Result<SubscriptionLimits, SaveError> {
        self.limits
            .get_limits(user.subscription_tier)
            .await
            .map_err(failed)?
            .ok_or_else(|| {
                SaveError::Failed(format!(
                    "no subscription limits for tier '{}'",
                    user.subscription_tier
                ))
            })
    }

    async fn require_favorites(&self, user: &User) -> Result<(), SaveError> {
        if self.limits_for(user).await?.can_favorite_gifts {
            Ok(())
        } else {
            Err(SaveError::CapabilityDenied)
        }
    }
}

fn failed(e: RepositoryError) -> SaveError {
    SaveError::Failed(e.to_string())
}

fn not_found_or_failed(e: RepositoryError) -> SaveError {
    match e {
        RepositoryError::NotFound => SaveError::NotFound,
        other => failed(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use giftafy_types::account::SubscriptionTier;
    use uuid::Uuid;

    use crate::search::catalog::GiftCatalog;
    use crate::service::testing::{MockHistory, MockLimits, MockSavedGifts, user_with_tier};

    type Svc = GiftLibraryService<MockSavedGifts, MockHistory, MockLimits>;

    fn service() -> Svc {
        GiftLibraryService::new(MockSavedGifts::default(), MockHistory::default(), MockLimits)
    }

    fn request(is_favorite: bool) -> SaveGiftRequest {
        SaveGiftRequest {
            gift: GiftCatalog::builtin().baseline()[0].record.clone(),
            is_favorite,
        }
    }

    #[tokio::test]
    async fn test_free_tier_cannot_save_as_favorite() {
        let svc = service();
        let free = user_with_tier(SubscriptionTier::Free);

        assert_eq!(
            svc.save_gift(&free, request(true)).await.unwrap_err(),
            SaveError::CapabilityDenied
        );
        assert!(svc.gifts.gifts.lock().unwrap().is_empty());

        let saved = svc.save_gift(&free, request(false)).await.unwrap();
        assert!(!saved.is_favorite);
        assert_eq!(saved.user_id, free.id);
    }

    #[tokio::test]
    async fn test_free_tier_can_remove_but_not_add_favorite() {
        let svc = service();
        let free = user_with_tier(SubscriptionTier::Free);

        let plain = svc.save_gift(&free, request(false)).await.unwrap();
        assert_eq!(
            svc.toggle_favorite(&free, &plain.id).await.unwrap_err(),
            SaveError::CapabilityDenied
        );

        // A favourite left over from a downgraded plan.
        let mut legacy = plain.clone();
        legacy.id = SavedGiftId::new();
        legacy.is_favorite = true;
        svc.gifts.gifts.lock().unwrap().push(legacy.clone());

        let toggled = svc.toggle_favorite(&free, &legacy.id).await.unwrap();
        assert!(!toggled.is_favorite);
    }

    #[tokio::test]
    async fn test_pro_tier_toggles_both_ways() {
        let svc = service();
        let pro = user_with_tier(SubscriptionTier::Pro);
        let saved = svc.save_gift(&pro, request(false)).await.unwrap();

        assert!(svc.toggle_favorite(&pro, &saved.id).await.unwrap().is_favorite);
        let lists = svc.list_saved(&pro).await.unwrap();
        assert_eq!(lists.favorites.len(), 1);
        assert!(lists.saved.is_empty());

        assert!(!svc.toggle_favorite(&pro, &saved.id).await.unwrap().is_favorite);
    }

    #[tokio::test]
    async fn test_cannot_touch_other_users_gifts() {
        let svc = service();
        let owner = user_with_tier(SubscriptionTier::Pro);
        let intruder = user_with_tier(SubscriptionTier::Pro);
        let saved = svc.save_gift(&owner, request(false)).await.unwrap();

        assert_eq!(
            svc.delete_gift(&intruder, &saved.id).await.unwrap_err(),
            SaveError::NotFound
        );
        assert_eq!(
            svc.toggle_favorite(&intruder, &saved.id).await.unwrap_err(),
            SaveError::NotFound
        );
        assert_eq!(svc.gifts.gifts.lock().unwrap().len(), 1);

        svc.delete_gift(&owner, &saved.id).await.unwrap();
        assert_eq!(
            svc.delete_gift(&owner, &saved.id).await.unwrap_err(),
            SaveError::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_saved_newest_first_and_split() {
        let svc = service();
        let pro = user_with_tier(SubscriptionTier::Pro);
        let first = svc.save_gift(&pro, request(false)).await.unwrap();
        let second = svc.save_gift(&pro, request(false)).await.unwrap();
        let third = svc.save_gift(&pro, request(true)).await.unwrap();
        {
            let mut gifts = svc.gifts.gifts.lock().unwrap();
            let base = Utc::now();
            gifts[0].created_at = base - Duration::minutes(2);
            gifts[1].created_at = base - Duration::minutes(1);
            gifts[2].created_at = base;
        }

        let lists = svc.list_saved(&pro).await.unwrap();
        let saved_ids: Vec<_> = lists.saved.iter().map(|g| g.id).collect();
        assert_eq!(saved_ids, vec![second.id, first.id]);
        assert_eq!(lists.favorites[0].id, third.id);
    }

    #[tokio::test]
    async fn test_history_limited_to_twenty() {
        let svc = service();
        let user = user_with_tier(SubscriptionTier::Free);
        let base = Utc::now();
        for n in 0..25 {
            svc.history.entries.lock().unwrap().push(SearchHistoryEntry {
                id: Uuid::now_v7(),
                user_id: user.id,
                search_terms: format!("search {n}"),
                created_at: base + Duration::seconds(n),
            });
        }

        let recent = svc.recent_searches(&user).await.unwrap();
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].search_terms, "search 24");
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let svc = service();
        let mut user = user_with_tier(SubscriptionTier::Free);
        user.search_count = 3;

        let dashboard = svc.dashboard(&user).await.unwrap();
        assert_eq!(dashboard.account.search_count, 3);
        assert_eq!(dashboard.account.daily_searches, 5);
        assert!(!dashboard.account.can_favorite_gifts);

        let tomorrow = Utc::now() + Duration::days(1);
        let summary = svc.summary(&user, tomorrow).await.unwrap();
        assert_eq!(summary.search_count, 0);
    }
}
