//! HTTP layer for Giftafy.
//!
//! Axum server exposing the hosted gift functions at `/functions/v1/`, the
//! account endpoints at `/auth/v1/`, and the dashboard at `/api/v1/` with
//! envelope responses.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
