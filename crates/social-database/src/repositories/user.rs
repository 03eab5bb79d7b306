//! User and invitation repository.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use social_core::error::{AppError, ConflictReason};
use social_core::result::AppResult;
use social_entity::{NewUser, PasswordHash, Role, User};

use super::{bounded, db_error};
use crate::store::UserStore;

/// Deletes a live invitation and yields its principal, in one statement.
const CONSUME_INVITATION: &str =
    "DELETE FROM user_invitations WHERE token = $1 AND expiry > NOW() RETURNING user_id";

const SELECT_USER: &str = "SELECT u.id, u.username, u.email, u.password, u.is_active, \
            u.role_id, u.created_at, \
            r.name AS role_name, r.description AS role_description, r.level AS role_level \
     FROM users u JOIN roles r ON r.id = u.role_id";

/// Flat row for a user joined with its role.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    is_active: bool,
    role_id: i64,
    created_at: DateTime<Utc>,
    role_name: String,
    role_description: String,
    role_level: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password: PasswordHash::from_encoded(row.password),
            is_active: row.is_active,
            role_id: row.role_id,
            role: Role {
                id: row.role_id,
                name: row.role_name,
                description: row.role_description,
                level: row.role_level,
            },
            created_at: row.created_at,
        }
    }
}

/// Repository for principals and their invitations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

/// Translate unique violations on `users` into named conflicts.
fn map_insert_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
            AppError::conflict_with(ConflictReason::DuplicateEmail)
        }
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("users_username_key") =>
        {
            AppError::conflict_with(ConflictReason::DuplicateUsername)
        }
        _ => db_error("Failed to create user")(e),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        bounded(self.timeout, "find user by id", async {
            let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find user by id"))?;
            Ok(row.map(User::from))
        })
        .await
    }

    async fn find_active_by_email(&self, email: &str) -> AppResult<Option<User>> {
        bounded(self.timeout, "find user by email", async {
            let row = sqlx::query_as::<_, UserRow>(&format!(
                "{SELECT_USER} WHERE u.email = $1 AND u.is_active = TRUE"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by email"))?;
            Ok(row.map(User::from))
        })
        .await
    }

    async fn create_with_invitation(
        &self,
        draft: &NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> AppResult<User> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal(format!("Invitation TTL out of range: {e}")))?;

        bounded(self.timeout, "create user with invitation", async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to begin transaction"))?;

            let id: i64 = sqlx::query_scalar(
                "INSERT INTO users (username, email, password, role_id) \
                 VALUES ($1, $2, $3, (SELECT id FROM roles WHERE name = $4)) \
                 RETURNING id",
            )
            .bind(&draft.username)
            .bind(&draft.email)
            .bind(draft.password.as_str())
            .bind(&draft.role)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_insert_error)?;

            sqlx::query("INSERT INTO user_invitations (token, user_id, expiry) VALUES ($1, $2, $3)")
                .bind(token_hash)
                .bind(id)
                .bind(Utc::now() + ttl)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to create invitation"))?;

            let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = $1"))
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("Failed to load created user"))?;

            tx.commit()
                .await
                .map_err(db_error("Failed to commit registration"))?;

            debug!(user_id = id, "Created user with invitation");
            Ok(User::from(row))
        })
        .await
    }

    async fn activate(&self, token_hash: &str) -> AppResult<()> {
        bounded(self.timeout, "activate user", async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to begin transaction"))?;

            // Consuming the row is the claim: a concurrent activation of the
            // same token blocks on the row lock and then deletes nothing.
            let user_id: Option<i64> = sqlx::query_scalar(CONSUME_INVITATION)
                .bind(token_hash)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to consume invitation"))?;

            let user_id = user_id.ok_or_else(|| AppError::not_found("Invitation not found"))?;

            sqlx::query("UPDATE users SET is_active = TRUE WHERE id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to activate user"))?;

            tx.commit()
                .await
                .map_err(db_error("Failed to commit activation"))?;

            debug!(user_id, "Activated user");
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        bounded(self.timeout, "delete user", async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to begin transaction"))?;

            sqlx::query("DELETE FROM user_invitations WHERE user_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to delete invitation"))?;

            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to delete user"))?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("User {id} not found")));
            }

            tx.commit()
                .await
                .map_err(db_error("Failed to commit user deletion"))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_invitation_claims_and_reads_in_one_statement() {
        let sql = CONSUME_INVITATION.to_ascii_uppercase();
        assert!(sql.starts_with("DELETE FROM USER_INVITATIONS"));
        assert!(sql.contains("EXPIRY > NOW()"));
        assert!(sql.ends_with("RETURNING USER_ID"));
        assert_eq!(sql.matches(';').count(), 0);
    }
}
