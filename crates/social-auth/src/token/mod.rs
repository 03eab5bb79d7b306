//! Opaque activation tokens.

pub mod codec;

pub use codec::{ActivationToken, TokenCodec};
