//! Infrastructure layer for Giftafy.
//!
//! Contains implementations of the ports defined in `giftafy-core`: SQLite
//! storage, Argon2/SHA-256 credentials, the reqwest client for the hosted
//! gift functions, upstream search sources, and config/catalog loading.

pub mod catalog;
pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod http;
pub mod sqlite;
pub mod upstream;
