//! Custom Axum extractors.

pub mod admin;
pub mod auth;
pub mod json;
pub mod path;

pub use admin::AdminAuth;
pub use auth::AuthUser;
pub use json::ValidatedJson;
pub use path::parse_id;
