//! Templated outbound email.

pub mod mailer;
pub mod template;

pub use mailer::{Mailer, STATUS_OK, SmtpMailer};
pub use template::{RenderedEmail, USER_INVITATION, UserInvitationEmail, render};
