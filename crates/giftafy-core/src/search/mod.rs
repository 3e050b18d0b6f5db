//! Gift search: query building, catalog matching, remote search with
//! fallback, and the client-side results view.

pub mod builder;
pub mod catalog;
pub mod filter;
pub mod generation;
pub mod remote;
pub mod results;
pub mod service;
pub mod text_parser;
pub mod web;
