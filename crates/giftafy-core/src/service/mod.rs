//! Business logic services (use cases).
//!
//! Services orchestrate repository calls, upstream searches, and business
//! rules. They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod account;
pub mod credentials;
pub mod gift;
pub mod quota;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;
