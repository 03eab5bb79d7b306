//! Email templates compiled into the binary.
//!
//! Bodies are askama templates under `templates/`. Interpolated values are
//! HTML-escaped, so user-chosen fields cannot inject markup.

use askama::Template;
use serde::Deserialize;
use serde_json::Value;

use social_core::error::AppError;

/// Invitation sent on registration. Expects `username` and `activation_url`.
pub const USER_INVITATION: &str = "user_invitation";

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body: String,
}

/// Body of the registration invitation.
#[derive(Debug, Template, Deserialize)]
#[template(path = "user_invitation.html")]
pub struct UserInvitationEmail {
    /// Recipient's chosen username.
    pub username: String,
    /// Link that activates the account.
    pub activation_url: String,
}

impl UserInvitationEmail {
    const SUBJECT: &'static str = "Finish registration with Social";
}

/// Render template `name` with `vars`.
///
/// Unknown templates and missing variables are errors, so a half-filled
/// mail is never sent.
pub fn render(name: &str, vars: &Value) -> Result<RenderedEmail, AppError> {
    match name {
        USER_INVITATION => {
            let email = UserInvitationEmail::deserialize(vars).map_err(|e| {
                AppError::internal(format!("Template '{name}' has invalid variables: {e}"))
            })?;
            finish(name, UserInvitationEmail::SUBJECT, &email)
        }
        _ => Err(AppError::internal(format!("Unknown email template '{name}'"))),
    }
}

fn finish(name: &str, subject: &str, template: &impl Template) -> Result<RenderedEmail, AppError> {
    let body = template
        .render()
        .map_err(|e| AppError::internal(format!("Failed to render template '{name}': {e}")))?;
    Ok(RenderedEmail {
        subject: subject.to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_invitation() {
        let vars = json!({
            "username": "alice",
            "activation_url": "http://localhost:4000/confirm/abc",
        });
        let email = render(USER_INVITATION, &vars).unwrap();
        assert_eq!(email.subject, "Finish registration with Social");
        assert!(email.body.contains("Hi alice,"));
        assert!(email.body.contains("<a href="));
        assert!(email.body.contains("abc"));
        assert!(!email.body.contains("{{"));
    }

    #[test]
    fn test_username_markup_is_escaped() {
        let vars = json!({
            "username": "<a href=\"https://evil.example\">click</a>",
            "activation_url": "http://localhost:4000/confirm/abc",
        });
        let email = render(USER_INVITATION, &vars).unwrap();
        assert!(!email.body.contains("<a href=\"https://evil.example\">"));
        assert!(!email.body.contains("\"https://evil"));
        assert!(email.body.contains("&lt;a href="));
        assert!(email.body.contains("click&lt;"));
        assert!(email.body.contains("&gt;"));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let err = render(USER_INVITATION, &json!({ "username": "alice" })).unwrap_err();
        assert!(err.message.contains("activation_url"));
    }

    #[test]
    fn test_unknown_template() {
        assert!(render("nope", &json!({})).is_err());
    }
}
