//! HTTP request handlers.

pub mod auth;
pub mod dashboard;
pub mod finder;
pub mod functions;
