//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};

use social_entity::User;

/// Context for the current authenticated request.
///
/// Built by the bearer extractor and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The resolved principal.
    pub user: User,
    /// IP address of the request origin.
    pub ip_address: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user: User, ip_address: String) -> Self {
        Self {
            user,
            ip_address,
            request_time: Utc::now(),
        }
    }

    /// The acting principal's id.
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}
