//! Integration tests driving the HTTP router over the in-memory store.

mod helpers;

mod auth_test;
mod health_test;
mod post_test;
mod user_test;
