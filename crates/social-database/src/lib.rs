//! # social-database
//!
//! Per-entity store contracts, their PostgreSQL implementations, and an
//! in-memory implementation used by tests and local runs. The [`Storage`]
//! bundle binds one implementation of every contract at startup.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{CommentStore, FollowerStore, PostStore, RoleStore, Storage, UserStore};
