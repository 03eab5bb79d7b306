//! Core traits defined in `social-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
