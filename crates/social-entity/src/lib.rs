//! # social-entity
//!
//! Domain entity models for the social API. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod post;
pub mod user;

pub use post::{Comment, FeedItem, NewComment, NewPost, Post, PostChanges, PostDetail};
pub use user::{Follower, Invitation, NewUser, PasswordHash, Role, User};
