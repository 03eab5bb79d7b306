//! Post domain entities.

pub mod comment;
pub mod model;

pub use comment::{Comment, NewComment};
pub use model::{FeedItem, NewPost, Post, PostChanges, PostDetail};
