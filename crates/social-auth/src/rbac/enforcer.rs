//! Role enforcement: owners act on their own resources, everyone else
//! needs a role at least as privileged as the one the action names.

use std::sync::Arc;

use tracing::{debug, error};

use social_core::error::AppError;
use social_core::result::AppResult;
use social_database::RoleStore;
use social_entity::User;

/// Decides whether a principal may act on a resource owned by someone.
#[derive(Clone)]
pub struct RoleEnforcer {
    roles: Arc<dyn RoleStore>,
}

impl std::fmt::Debug for RoleEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleEnforcer").finish_non_exhaustive()
    }
}

impl RoleEnforcer {
    /// Creates an enforcer over the role catalog.
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// Allow when `principal` owns the resource; otherwise require that the
    /// principal's role level is at least that of `required_role`.
    ///
    /// The owner check never touches the role catalog. A `required_role`
    /// missing from the catalog is a server fault, not a denial.
    pub async fn authorize_owner_or_role(
        &self,
        principal: &User,
        owner_id: i64,
        required_role: &str,
    ) -> AppResult<()> {
        if principal.id == owner_id {
            return Ok(());
        }

        let Some(required) = self.roles.find_by_name(required_role).await? else {
            error!(role = required_role, "Required role is missing from the catalog");
            return Err(AppError::internal(format!(
                "Role '{required_role}' is not defined"
            )));
        };

        if principal.role.meets(required.level) {
            debug!(
                user_id = principal.id,
                role = %principal.role.name,
                required = %required.name,
                "Role grants access"
            );
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{}' is insufficient; minimum required: '{}'",
                principal.role.name, required.name
            )))
        }
    }
}
