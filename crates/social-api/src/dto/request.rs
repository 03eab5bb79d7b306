//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use social_entity::PostChanges;
use social_service::{RegisterInput, UpdatePost};

/// `POST /v1/authentication/user`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 100, message = "username must be 1 to 100 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 3, max = 72, message = "password must be 3 to 72 characters"))]
    pub password: String,
}

impl From<RegisterUserRequest> for RegisterInput {
    fn from(req: RegisterUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

/// `POST /v1/authentication/token`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTokenRequest {
    /// Account email.
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Account password.
    #[validate(length(min = 3, max = 72, message = "password must be 3 to 72 characters"))]
    pub password: String,
}

/// `POST /v1/posts`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Title.
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    /// Body.
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `PATCH /v1/posts/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    /// New title.
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    /// New body.
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Version the client last read.
    pub version: Option<i32>,
}

impl From<UpdatePostRequest> for UpdatePost {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            changes: PostChanges {
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
            expected_version: req.version,
        }
    }
}

/// `POST /v1/posts/{id}/comments`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment text.
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}
