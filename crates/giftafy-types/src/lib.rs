//! Shared domain types for Giftafy.
//!
//! This crate contains the core domain types used across the Giftafy service:
//! gift queries, gift records, accounts, the hosted-function wire contract,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod account;
pub mod config;
pub mod error;
pub mod function;
pub mod gift;
pub mod query;
