//! Posts and their comments.

pub mod comment;
pub mod service;

pub use comment::CommentService;
pub use service::{PostService, UpdatePost};
