//! Request extractors: bearer-session authentication and query parameters.

pub mod auth;
pub mod query;
