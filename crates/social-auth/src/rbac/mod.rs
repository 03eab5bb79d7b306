//! Ownership-or-role-level authorization.

pub mod enforcer;

pub use enforcer::RoleEnforcer;
