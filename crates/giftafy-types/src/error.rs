use thiserror::Error;

/// Errors from a gift search, on either side of the hosted function.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// No session, or the session was rejected. Not retried.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The account has used its daily search allowance. Never falls back.
    #[error("daily search limit exceeded")]
    QuotaExceeded,

    /// Network failure, non-2xx status, or an unusable response.
    #[error("search temporarily unavailable: {0}")]
    Transient(String),

    /// The upstream source answered but nothing matched.
    #[error("no gifts found")]
    NoResults,

    /// The third-party source behind the hosted function failed.
    #[error("upstream search failed: {0}")]
    Upstream(String),

    /// A newer search was started before this one finished.
    #[error("search superseded by a newer request")]
    Superseded,

    #[error("storage error: {0}")]
    Storage(String),
}

impl SearchError {
    /// Whether the client should fall back to the local catalog.
    ///
    /// Only the quota signal and supersession stop the fallback; every other
    /// failure degrades to offline results.
    pub fn allows_fallback(&self) -> bool {
        !matches!(self, SearchError::QuotaExceeded | SearchError::Superseded)
    }
}

/// Errors from saving or updating a gift on an account.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SaveError {
    #[error("authentication required")]
    AuthenticationRequired,

    /// The account's tier does not include this capability (favouriting).
    #[error("your subscription tier does not allow favoriting gifts")]
    CapabilityDenied,

    #[error("saved gift not found")]
    NotFound,

    #[error("failed to save gift: {0}")]
    Failed(String),
}

/// Errors from the account service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session expired or invalid")]
    SessionExpired,

    #[error("account not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors loading a gift catalog from its configured source.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(String),

    #[error("invalid catalog file: {0}")]
    Parse(String),

    #[error("catalog entry '{0}' is invalid: {1}")]
    InvalidEntry(String, String),
}

/// Errors from repository operations (used by trait definitions in giftafy-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
