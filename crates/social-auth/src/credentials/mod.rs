//! `Authorization` header parsing and the static administrative credentials.

pub mod basic;
pub mod header;

pub use basic::StaticCredentials;
pub use header::{BasicCredentials, CredentialError, parse_basic, parse_bearer};
