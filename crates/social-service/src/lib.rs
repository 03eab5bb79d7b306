//! # social-service
//!
//! Business logic service layer for the social API. Each service
//! orchestrates the store contracts, the principal cache, the auth
//! primitives and the mailer to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod notification;
pub mod post;
pub mod user;

pub use context::RequestContext;
pub use notification::{Mailer, SmtpMailer};
pub use post::{CommentService, PostService, UpdatePost};
pub use user::{AccountService, Registration, RegisterInput, UserService};
