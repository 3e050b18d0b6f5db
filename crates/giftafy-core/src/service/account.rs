//! Account service: sign-up, sign-in, session lookup and sign-out.
//!
//! Passwords are hashed through [`CredentialHasher`]; bearer tokens are
//! issued by [`TokenIssuer`] and only their hashes reach the session store.

use chrono::{DateTime, Duration, Utc};

use giftafy_types::account::{AuthSession, Credentials, SessionRecord, SubscriptionTier, User, UserId};
use giftafy_types::error::{AccountError, RepositoryError};

use crate::repository::account::{AccountRepository, SessionRepository};
use crate::service::credentials::{CredentialHasher, TokenIssuer};

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Service managing accounts and their sessions.
pub struct AccountService<A: AccountRepository, S: SessionRepository, C: CredentialHasher, T: TokenIssuer> {
    accounts: A,
    sessions: S,
    hasher: C,
    tokens: T,
    session_ttl: Duration,
}

impl<A: AccountRepository, S: SessionRepository, C: CredentialHasher, T: TokenIssuer>
    AccountService<A, S, C, T>
{
    pub fn new(accounts: A, sessions: S, hasher: C, tokens: T, session_ttl_hours: u32) -> Self {
        Self {
            accounts,
            sessions,
            hasher,
            tokens,
            session_ttl: Duration::hours(i64::from(session_ttl_hours)),
        }
    }

    /// Create an account on the free tier without opening a session.
    pub async fn register(&self, credentials: &Credentials) -> Result<User, AccountError> {
        let email = normalize_email(&credentials.email)?;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword(MIN_PASSWORD_LEN));
        }

        if self
            .accounts
            .get_user_by_email(&email)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(AccountError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email,
            password_hash: self.hasher.hash_password(&credentials.password)?,
            subscription_tier: SubscriptionTier::Free,
            search_count: 0,
            last_search_reset: now,
            created_at: now,
        };

        let user = self.accounts.create_user(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AccountError::EmailTaken,
            other => storage(other),
        })?;

        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    /// Register and sign in.
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSession, AccountError> {
        let user = self.register(credentials).await?;
        self.open_session(user).await
    }

    /// Exchange email and password for a bearer session.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AccountError> {
        let email = credentials.email.trim().to_lowercase();
        let user = self
            .accounts
            .get_user_by_email(&email)
            .await
            .map_err(storage)?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self
            .hasher
            .verify_password(&credentials.password, &user.password_hash)
        {
            tracing::info!(user_id = %user.id, "sign-in rejected");
            return Err(AccountError::InvalidCredentials);
        }

        self.open_session(user).await
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate(&self, token: &str) -> Result<User, AccountError> {
        self.authenticate_at(token, Utc::now()).await
    }

    pub async fn authenticate_at(&self, token: &str, now: DateTime<Utc>) -> Result<User, AccountError> {
        let token_hash = self.tokens.hash_token(token);
        let session = self
            .sessions
            .get_session(&token_hash)
            .await
            .map_err(storage)?
            .ok_or(AccountError::SessionExpired)?;

        if session.is_expired(now) {
            self.sessions
                .delete_session(&token_hash)
                .await
                .map_err(storage)?;
            return Err(AccountError::SessionExpired);
        }

        self.accounts
            .get_user(&session.user_id)
            .await
            .map_err(storage)?
            .ok_or(AccountError::SessionExpired)
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> Result<(), AccountError> {
        let token_hash = self.tokens.hash_token(token);
        self.sessions
            .delete_session(&token_hash)
            .await
            .map_err(storage)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AccountError> {
        self.accounts
            .get_user_by_email(&email.trim().to_lowercase())
            .await
            .map_err(storage)?
            .ok_or(AccountError::NotFound)
    }

    /// Move an account to another subscription tier.
    pub async fn set_tier(&self, email: &str, tier: SubscriptionTier) -> Result<User, AccountError> {
        let mut user = self.get_by_email(email).await?;
        self.accounts
            .set_tier(&user.id, tier)
            .await
            .map_err(storage)?;
        tracing::info!(user_id = %user.id, %tier, "subscription tier changed");
        user.subscription_tier = tier;
        Ok(user)
    }

    /// Delete sessions that have expired. Returns how many were removed.
    pub async fn prune_sessions(&self) -> Result<u64, AccountError> {
        self.sessions
            .delete_expired(Utc::now())
            .await
            .map_err(storage)
    }

    async fn open_session(&self, user: User) -> Result<AuthSession, AccountError> {
        let token = self.tokens.issue_token();
        let now = Utc::now();
        let record = SessionRecord {
            token_hash: self.tokens.hash_token(&token),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions
            .create_session(&record)
            .await
            .map_err(storage)?;

        tracing::debug!(user_id = %user.id, expires_at = %record.expires_at, "session opened");
        Ok(AuthSession {
            access_token: token,
            token_type: "bearer".to_string(),
            expires_at: record.expires_at,
            user,
        })
    }
}

fn storage(e: RepositoryError) -> AccountError {
    AccountError::Storage(e.to_string())
}

/// Trim and lowercase an email, rejecting obviously malformed addresses.
pub fn normalize_email(email: &str) -> Result<String, AccountError> {
    let email = email.trim().to_lowercase();
    let (local, domain) = email.split_once('@').ok_or(AccountError::InvalidEmail)?;

    let valid = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    if !valid {
        return Err(AccountError::InvalidEmail);
    }
    Ok(email)
}
