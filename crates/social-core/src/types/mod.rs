//! Core type definitions used across the workspace.

pub mod feed;

pub use feed::{FeedQuery, SortDirection};
