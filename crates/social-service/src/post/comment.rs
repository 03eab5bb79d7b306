//! Comments on posts.

use std::sync::Arc;

use tracing::info;

use social_core::result::AppResult;
use social_database::{CommentStore, Storage};
use social_entity::{Comment, NewComment};

use crate::context::RequestContext;

/// Adds comments to posts.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService").finish_non_exhaustive()
    }
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(storage: &Storage) -> Self {
        Self {
            comments: Arc::clone(&storage.comments),
        }
    }

    /// Comment on `post_id` as the caller. A missing post is `NotFound`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        post_id: i64,
        content: String,
    ) -> AppResult<Comment> {
        let comment = self
            .comments
            .create(&NewComment {
                post_id,
                user_id: ctx.user_id(),
                content,
            })
            .await?;
        info!(comment_id = comment.id, post_id, user_id = ctx.user_id(), "Comment created");
        Ok(comment)
    }
}
