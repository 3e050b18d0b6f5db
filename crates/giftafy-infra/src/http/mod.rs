//! HTTP client for the hosted gift functions.

pub mod client;
