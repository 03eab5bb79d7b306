//! PostgreSQL implementations of the store contracts.

pub mod comment;
pub mod follower;
pub mod post;
pub mod role;
pub mod user;

pub use comment::CommentRepository;
pub use follower::FollowerRepository;
pub use post::PostRepository;
pub use role::RoleRepository;
pub use user::UserRepository;

use std::future::Future;
use std::time::Duration;

use social_core::error::{AppError, ErrorKind};
use social_core::result::AppResult;

/// Run a store call under a fixed time budget.
///
/// An open transaction inside `fut` is dropped (and rolled back) when the
/// budget elapses.
pub(crate) async fn bounded<T, F>(limit: Duration, operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(elapsed) => Err(AppError::with_source(
            ErrorKind::Timeout,
            format!("{operation} exceeded {}ms", limit.as_millis()),
            elapsed,
        )),
    }
}

/// Map a sqlx error to a database error with context.
pub(crate) fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| AppError::with_source(ErrorKind::Database, context.to_string(), e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let result: AppResult<()> = bounded(Duration::from_secs(5), "stalled query", async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert!(err.message.contains("stalled query"));
    }

    #[tokio::test]
    async fn test_bounded_passes_through() {
        let result = bounded(Duration::from_secs(5), "quick", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);

        let result: AppResult<()> = bounded(Duration::from_secs(5), "failing", async {
            Err(AppError::not_found("missing"))
        })
        .await;
        assert_eq!(result.unwrap_err().kind, ErrorKind::NotFound);
    }
}
