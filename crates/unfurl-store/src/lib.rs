//! [`LinkStore`](unfurl_core::LinkStore) implementations.
//!
//! Two backends are provided: an in-memory store backed by `DashMap`
//! (single-process deployments and tests) and a Redis store where the
//! retention window maps directly onto key TTLs.

pub mod memory;
pub mod redis;

pub use memory::InMemoryLinkStore;
pub use redis::RedisLinkStore;
