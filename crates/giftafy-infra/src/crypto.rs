//! Password hashing and session tokens.
//!
//! Implements `CredentialHasher` with Argon2id (PHC strings, random salt per
//! password) and `TokenIssuer` with 32 random bytes from the OS, hex-encoded,
//! stored as their SHA-256 digest.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use giftafy_core::service::credentials::{CredentialHasher, TokenIssuer};
use giftafy_types::error::AccountError;

/// Argon2id password hasher using OWASP recommended parameters
/// (19 MiB memory, 2 iterations, 1 lane).
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        let params = Params::new(19456, 2, 1, None).unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AccountError::Storage(format!("password hashing failed: {e}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Bearer token issuer backed by the OS random source.
pub struct Sha256TokenIssuer;

impl Sha256TokenIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenIssuer for Sha256TokenIssuer {
    fn issue_token(&self) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn hash_token(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hasher = Argon2CredentialHasher::new();
        let hash = hasher.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("correct horse", &hash));
        assert!(!hasher.verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = Argon2CredentialHasher::new();
        let a = hasher.hash_password("repeat-me").unwrap();
        let b = hasher.hash_password("repeat-me").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = Argon2CredentialHasher::new();
        assert!(!hasher.verify_password("anything", "not-a-phc-string"));
        assert!(!hasher.verify_password("anything", ""));
    }

    #[test]
    fn test_tokens_are_random_hex() {
        let issuer = Sha256TokenIssuer::new();
        let a = issuer.issue_token();
        let b = issuer.issue_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_hash_known_value() {
        let issuer = Sha256TokenIssuer::new();
        assert_eq!(
            issuer.hash_token(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(issuer.hash_token("abc"), issuer.hash_token("abc"));
    }
}
