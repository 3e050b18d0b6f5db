//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (giftafy-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod account;
pub mod saved_gift;
pub mod search_history;
pub mod subscription;
