//! Business logic and repository trait definitions for Giftafy.
//!
//! This crate defines the "ports" (repository and remote-search traits) that
//! the infrastructure layer implements. It depends only on `giftafy-types` --
//! never on `giftafy-infra` or any database/IO crate.

pub mod form;
pub mod repository;
pub mod search;
pub mod service;
