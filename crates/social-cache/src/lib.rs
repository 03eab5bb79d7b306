//! # social-cache
//!
//! Cache provider implementations and the read-through principal cache.
//! Supports two backends:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. The cache is
//! never the system of record: failures are logged and lookups fall through
//! to the store.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
pub mod user;

pub use provider::CacheManager;
pub use user::UserCache;
