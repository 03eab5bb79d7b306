//! Role catalog repository.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use social_core::result::AppResult;
use social_entity::Role;

use super::{bounded, db_error};
use crate::store::RoleStore;

/// Read-only access to the seeded role catalog.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
    timeout: Duration,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        bounded(self.timeout, "find role by name", async {
            sqlx::query_as::<_, Role>(
                "SELECT id, name, description, level FROM roles WHERE name = $1",
            )
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find role by name"))
        })
        .await
    }
}
