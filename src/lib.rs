//! refstore - reference data cache for a multi-tenant cloud console
//!
//! Keeps id → display-record maps for console resources (projects, users,
//! providers, ...) with TTL-based freshness, scope gating and batched id
//! resolution. The `refstore` binary exposes the cache from the command line.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod reference;
