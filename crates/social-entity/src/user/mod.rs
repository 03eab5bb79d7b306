//! User domain entities.

pub mod follower;
pub mod invitation;
pub mod model;
pub mod password;
pub mod role;

pub use follower::Follower;
pub use invitation::Invitation;
pub use model::{NewUser, User};
pub use password::PasswordHash;
pub use role::Role;
