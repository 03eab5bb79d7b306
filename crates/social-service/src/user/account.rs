//! Registration, activation and login.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use social_auth::jwt::IssuedToken;
use social_auth::{InvitationLedger, JwtEncoder, PasswordHasher, PasswordValidator, TokenCodec};
use social_core::config::AppConfig;
use social_core::error::AppError;
use social_core::result::AppResult;
use social_database::{Storage, UserStore};
use social_entity::user::role;
use social_entity::{NewUser, PasswordHash, User};

use crate::notification::{Mailer, USER_INVITATION};

/// Returned to login callers on every failure, so absent, inactive and
/// wrong-password accounts are indistinguishable.
const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// A freshly registered, still inactive principal and its raw activation token.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// The created principal.
    pub user: User,
    /// Raw activation token. Only its hash is stored.
    pub token: String,
}

/// Drives the account lifecycle: register with invitation, activate, log in.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    ledger: InvitationLedger,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    encoder: JwtEncoder,
    mailer: Arc<dyn Mailer>,
    invitation_ttl: Duration,
    frontend_url: String,
    sandbox: bool,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("invitation_ttl", &self.invitation_ttl)
            .field("sandbox", &self.sandbox)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    /// Creates the service from the bound storage and configuration.
    pub fn new(storage: &Storage, config: &AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            users: Arc::clone(&storage.users),
            ledger: InvitationLedger::new(Arc::clone(&storage.users)),
            hasher: PasswordHasher::from_config(&config.auth),
            validator: PasswordValidator::new(&config.auth),
            encoder: JwtEncoder::new(&config.auth.token),
            mailer,
            invitation_ttl: Duration::from_secs(config.auth.invitation_ttl_minutes * 60),
            frontend_url: config.server.frontend_url.trim_end_matches('/').to_string(),
            sandbox: !config.server.is_production(),
        }
    }

    /// Register an inactive principal and send its invitation.
    ///
    /// When the invitation cannot be sent the principal is deleted again and
    /// the call fails with `Internal`.
    pub async fn register(&self, input: RegisterInput) -> AppResult<Registration> {
        self.validator.validate(&input.password)?;
        let password = self.hash(input.password).await?;

        let token = TokenCodec::generate();
        let draft = NewUser {
            username: input.username,
            email: input.email,
            password,
            role: role::USER.to_string(),
        };

        let user = self
            .ledger
            .create_with_invitation(&draft, &token.raw, self.invitation_ttl)
            .await?;

        let vars = json!({
            "username": user.username,
            "activation_url": format!("{}/confirm/{}", self.frontend_url, token.raw),
        });

        match self
            .mailer
            .send(USER_INVITATION, &user.username, &user.email, &vars, self.sandbox)
            .await
        {
            Ok(status) => {
                info!(user_id = user.id, status, sandbox = self.sandbox, "User registered");
                Ok(Registration {
                    user,
                    token: token.raw,
                })
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "Failed to send invitation email");
                if let Err(revoke_err) = self.ledger.revoke(user.id).await {
                    error!(
                        user_id = user.id,
                        error = %revoke_err,
                        "Failed to delete user after invitation failure"
                    );
                }
                Err(AppError::internal("failed to send invitation email"))
            }
        }
    }

    /// Consume an activation token. Unknown, expired and used tokens are `NotFound`.
    pub async fn activate(&self, raw_token: &str) -> AppResult<()> {
        self.ledger.activate(raw_token).await?;
        info!("User activated");
        Ok(())
    }

    /// Exchange email and password of an active principal for a session token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<IssuedToken> {
        let Some(user) = self.users.find_active_by_email(email).await? else {
            warn!("Login for unknown or inactive account");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.verify(user.password.clone(), password.to_string()).await? {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let issued = self.encoder.issue(user.id)?;
        info!(user_id = user.id, expires_at = %issued.expires_at, "Session token issued");
        Ok(issued)
    }

    async fn hash(&self, password: String) -> AppResult<PasswordHash> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    async fn verify(&self, hash: PasswordHash, candidate: String) -> AppResult<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&hash, &candidate))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))
    }
}
