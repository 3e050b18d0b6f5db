//! Password hashing and session token traits.
//!
//! Defined in giftafy-core so the account service can handle credentials
//! without coupling to a specific algorithm. The Argon2 / SHA-256 adapters
//! live in giftafy-infra.

use giftafy_types::error::AccountError;

/// Abstraction over password hashing.
pub trait CredentialHasher: Send + Sync {
    /// Hash a password into a self-describing string (salt included).
    fn hash_password(&self, password: &str) -> Result<String, AccountError>;

    /// Check a password against a stored hash. Malformed hashes never verify.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Abstraction over bearer token generation.
pub trait TokenIssuer: Send + Sync {
    /// A fresh, unguessable bearer token.
    fn issue_token(&self) -> String;

    /// The stored form of a token (hex-encoded digest).
    fn hash_token(&self, token: &str) -> String;
}
