//! Pagination and ordering for the user feed.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default number of feed items per page.
pub const DEFAULT_FEED_LIMIT: i64 = 20;
/// Maximum number of feed items per page.
pub const MAX_FEED_LIMIT: i64 = 20;

/// Sort direction on post creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Query parameters for `GET /users/feed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeedQuery {
    /// Number of items to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: i64,
    /// Ordering on `created_at`.
    #[serde(default)]
    pub sort: SortDirection,
}

impl FeedQuery {
    /// Check the bounds on `limit` and `offset`.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_FEED_LIMIT).contains(&self.limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {MAX_FEED_LIMIT}"
            )));
        }
        if self.offset < 0 {
            return Err(AppError::validation("offset must not be negative"));
        }
        Ok(())
    }
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FEED_LIMIT,
            offset: 0,
            sort: SortDirection::Desc,
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_FEED_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_valid() {
        let query = FeedQuery::default();
        assert!(query.validate().is_ok());
        assert_eq!(query.sort.as_sql(), "DESC");
    }

    #[test]
    fn test_limit_out_of_range() {
        let query = FeedQuery {
            limit: 21,
            ..FeedQuery::default()
        };
        assert!(query.validate().is_err());

        let query = FeedQuery {
            limit: 0,
            ..FeedQuery::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_negative_offset() {
        let query = FeedQuery {
            offset: -1,
            ..FeedQuery::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_sort_deserializes_lowercase() {
        let query: FeedQuery = serde_json::from_str(r#"{"sort":"asc"}"#).unwrap();
        assert_eq!(query.sort, SortDirection::Asc);
        assert_eq!(query.limit, DEFAULT_FEED_LIMIT);
    }
}
