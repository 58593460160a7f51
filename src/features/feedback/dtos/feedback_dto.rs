use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::dtos::AuthUserDto;
use crate::features::comments::dtos::CommentTreeDto;
use crate::features::feedback::models::FeedbackWithAuthor;

/// Request DTO for submitting feedback
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,
}

/// Request DTO for partial feedback updates (author only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeedbackDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,
}

/// Feedback item as returned by list/create/update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: AuthUserDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeedbackWithAuthor> for FeedbackResponseDto {
    fn from(f: FeedbackWithAuthor) -> Self {
        Self {
            id: f.id,
            title: f.title,
            description: f.description,
            category: f.category,
            author: AuthUserDto {
                id: f.user_id,
                name: f.author_name,
                email: f.author_email,
                created_at: None,
            },
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Feedback item with its root-comment trees attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDetailDto {
    #[serde(flatten)]
    pub feedback: FeedbackResponseDto,
    pub comments: Vec<CommentTreeDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_dto_rejects_empty_title() {
        let dto = CreateFeedbackDto {
            title: "".to_string(),
            description: "something".to_string(),
            category: "feature".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_dto_rejects_oversized_category() {
        let dto = CreateFeedbackDto {
            title: "Add dark mode".to_string(),
            description: "please".to_string(),
            category: "x".repeat(101),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_allows_all_fields_absent() {
        let dto = UpdateFeedbackDto {
            title: None,
            description: None,
            category: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_dto_validates_present_fields() {
        let dto = UpdateFeedbackDto {
            title: Some("".to_string()),
            description: None,
            category: None,
        };
        assert!(dto.validate().is_err());
    }
}
