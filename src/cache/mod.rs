//! Response cache for console API calls
//!
//! Wraps a [`ConsoleApi`](crate::client::ConsoleApi) and memoizes `list`
//! responses in memory, keyed by the query's service, resource, tenant
//! context and canonical parameters.

pub mod client;
pub mod key;
pub mod storage;

pub use client::CachedConsoleClient;
pub use key::ServiceQueryKey;
pub use storage::{CacheStats, ResponseStorage};
