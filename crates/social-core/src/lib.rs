//! # social-core
//!
//! Core crate for the social API server. Contains the configuration schema,
//! the cache provider trait, feed query types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ConflictReason, ErrorKind};
pub use result::AppResult;
