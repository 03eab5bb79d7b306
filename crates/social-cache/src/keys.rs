//! Cache key builders.
//!
//! Backends add their own namespace prefix (see `cache.redis.key_prefix`).

/// Cache key for a principal by ID.
pub fn user_by_id(user_id: i64) -> String {
    format!("user:{user_id}")
}
