//! Account lifecycle and principal operations.

pub mod account;
pub mod service;

pub use account::{AccountService, RegisterInput, Registration};
pub use service::UserService;
