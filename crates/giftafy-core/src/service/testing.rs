//! In-memory implementations of the repository and credential traits for
//! service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use giftafy_types::account::{
    SearchUsage, SessionRecord, SubscriptionLimits, SubscriptionTier, User, UserId,
};
use giftafy_types::error::{AccountError, RepositoryError};
use giftafy_types::gift::{SavedGift, SavedGiftId, SearchHistoryEntry};

use crate::repository::account::{AccountRepository, SessionRepository};
use crate::repository::saved_gift::SavedGiftRepository;
use crate::repository::search_history::SearchHistoryRepository;
use crate::repository::subscription::SubscriptionRepository;
use crate::service::credentials::{CredentialHasher, TokenIssuer};
use crate::service::quota;

#[derive(Default)]
pub(crate) struct MockAccounts {
    pub users: Mutex<HashMap<UserId, User>>,
}

impl MockAccounts {
    pub fn with_user(user: User) -> Self {
        let accounts = Self::default();
        accounts.users.lock().unwrap().insert(user.id, user);
        accounts
    }

    pub fn user(&self, id: &UserId) -> User {
        self.users.lock().unwrap().get(id).cloned().unwrap()
    }
}

impl AccountRepository for MockAccounts {
    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(user.email.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn charge_search(
        &self,
        id: &UserId,
        daily_limit: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<SearchUsage>, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(id) else {
            return Ok(None);
        };
        let current = SearchUsage {
            search_count: user.search_count,
            last_search_reset: user.last_search_reset,
        };
        let next = quota::charge(current, daily_limit, now);
        if let Some(next) = next {
            user.search_count = next.search_count;
            user.last_search_reset = next.last_search_reset;
        }
        Ok(next)
    }

    async fn set_tier(&self, id: &UserId, tier: SubscriptionTier) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(id).ok_or(RepositoryError::NotFound)?;
        user.subscription_tier = tier;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockSessions {
    pub sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl SessionRepository for MockSessions {
    async fn create_session(&self, session: &SessionRecord) -> Result<(), RepositoryError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(self.sessions.lock().unwrap().get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), RepositoryError> {
        self.sessions.lock().unwrap().remove(token_hash);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Default)]
pub(crate) struct MockSavedGifts {
    pub gifts: Mutex<Vec<SavedGift>>,
}

impl SavedGiftRepository for MockSavedGifts {
    async fn create(&self, gift: &SavedGift) -> Result<SavedGift, RepositoryError> {
        self.gifts.lock().unwrap().push(gift.clone());
        Ok(gift.clone())
    }

    async fn get(&self, id: &SavedGiftId) -> Result<Option<SavedGift>, RepositoryError> {
        Ok(self
            .gifts
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == *id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<SavedGift>, RepositoryError> {
        let mut gifts: Vec<SavedGift> = self
            .gifts
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == *user_id)
            .cloned()
            .collect();
        gifts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(gifts)
    }

    async fn set_favorite(&self, id: &SavedGiftId, is_favorite: bool) -> Result<(), RepositoryError> {
        let mut gifts = self.gifts.lock().unwrap();
        let gift = gifts
            .iter_mut()
            .find(|g| g.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        gift.is_favorite = is_favorite;
        Ok(())
    }

    async fn delete(&self, id: &SavedGiftId) -> Result<(), RepositoryError> {
        let mut gifts = self.gifts.lock().unwrap();
        let before = gifts.len();
        gifts.retain(|g| g.id != *id);
        if gifts.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockHistory {
    pub entries: Mutex<Vec<SearchHistoryEntry>>,
}

impl SearchHistoryRepository for MockHistory {
    async fn append(&self, entry: &SearchHistoryEntry) -> Result<(), RepositoryError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list_recent(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<SearchHistoryEntry>, RepositoryError> {
        let mut entries: Vec<SearchHistoryEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == *user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

/// The seeded tier table.
pub(crate) struct MockLimits;

impl SubscriptionRepository for MockLimits {
    async fn get_limits(
        &self,
        tier: SubscriptionTier,
    ) -> Result<Option<SubscriptionLimits>, RepositoryError> {
        Ok(seeded_limits().into_iter().find(|l| l.tier == tier))
    }

    async fn list_limits(&self) -> Result<Vec<SubscriptionLimits>, RepositoryError> {
        Ok(seeded_limits())
    }
}

fn seeded_limits() -> Vec<SubscriptionLimits> {
    vec![
        SubscriptionLimits {
            tier: SubscriptionTier::Free,
            daily_searches: 5,
            can_favorite_gifts: false,
        },
        SubscriptionLimits {
            tier: SubscriptionTier::Pro,
            daily_searches: 100,
            can_favorite_gifts: true,
        },
        SubscriptionLimits {
            tier: SubscriptionTier::Enterprise,
            daily_searches: 1000,
            can_favorite_gifts: true,
        },
    ]
}

/// Reversible "hash" so tests can tell hashed from plain.
pub(crate) struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}

/// Sequential tokens: "token-1", "token-2", ...
#[derive(Default)]
pub(crate) struct CountingTokens {
    next: AtomicU64,
}

impl TokenIssuer for CountingTokens {
    fn issue_token(&self) -> String {
        format!("token-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn hash_token(&self, token: &str) -> String {
        format!("hash:{token}")
    }
}

pub(crate) fn user_with_tier(tier: SubscriptionTier) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(),
        email: format!("{tier}@example.com"),
        password_hash: String::new(),
        subscription_tier: tier,
        search_count: 0,
        last_search_reset: now,
        created_at: now,
    }
}
