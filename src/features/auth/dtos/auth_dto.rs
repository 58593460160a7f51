use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::{AuthenticatedUser, User};

/// Request DTO for user registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    /// Display name, also used for mention resolution
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email must not exceed 255 characters"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Password confirmation does not match"))]
    pub password_confirmation: String,
}

/// Request DTO for login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for AuthUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: Some(u.created_at),
        }
    }
}

impl From<AuthenticatedUser> for AuthUserDto {
    fn from(u: AuthenticatedUser) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: None,
        }
    }
}

/// Response DTO carrying the user and their fresh bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    pub user: AuthUserDto,
    pub access_token: String,
    pub token_type: String,
}

impl AuthResponseDto {
    pub fn new(user: AuthUserDto, access_token: String) -> Self {
        Self {
            user,
            access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_register() -> RegisterDto {
        RegisterDto {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct-horse".to_string(),
            password_confirmation: "correct-horse".to_string(),
        }
    }

    #[test]
    fn test_register_dto_valid() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn test_register_dto_rejects_short_password() {
        let mut dto = valid_register();
        dto.password = "short".to_string();
        dto.password_confirmation = "short".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_rejects_mismatched_confirmation() {
        let mut dto = valid_register();
        dto.password_confirmation = "something-else".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_rejects_bad_email() {
        let mut dto = valid_register();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }
}
