//! # social-auth
//!
//! Identity and authorization core for the social API.
//!
//! ## Modules
//!
//! - `password`: Argon2id credential vault and length policy
//! - `token`: random activation tokens and their lookup hashes
//! - `invitation`: atomic registration-with-invitation and one-shot activation
//! - `jwt`: session claim issuance and validation
//! - `credentials`: `Authorization` header parsing and static credentials
//! - `rbac`: ownership-or-role-level enforcement

pub mod credentials;
pub mod invitation;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod token;

pub use credentials::{BasicCredentials, CredentialError, StaticCredentials};
pub use invitation::InvitationLedger;
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::RoleEnforcer;
pub use token::{ActivationToken, TokenCodec};
