//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::comment::Comment;

/// A versioned post.
///
/// `version` starts at 0 and grows by exactly one on every successful update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Owning principal.
    pub user_id: i64,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Optimistic concurrency counter.
    pub version: i32,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A post together with its comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    /// The post row.
    #[serde(flatten)]
    pub post: Post,
    /// Comments, newest first.
    pub comments: Vec<Comment>,
}

/// Data required to create a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Owning principal.
    pub user_id: i64,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// Partial update applied by a conditional write. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New tags.
    pub tags: Option<Vec<String>>,
}

impl PostChanges {
    /// Apply the changes to an in-memory copy of a post.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(tags) = &self.tags {
            post.tags = tags.clone();
        }
    }
}

/// A feed entry: a post with its author and comment count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedItem {
    /// The post row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    /// Author's username.
    pub username: String,
    /// Number of comments on the post.
    pub comments_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_unset_fields() {
        let now = Utc::now();
        let mut post = Post {
            id: 1,
            title: "old".to_string(),
            content: "body".to_string(),
            user_id: 1,
            tags: vec!["a".to_string()],
            version: 0,
            created_at: now,
            updated_at: now,
        };

        PostChanges {
            title: Some("new".to_string()),
            ..PostChanges::default()
        }
        .apply_to(&mut post);

        assert_eq!(post.title, "new");
        assert_eq!(post.content, "body");
        assert_eq!(post.tags, vec!["a".to_string()]);
        assert_eq!(post.version, 0);
    }
}
