use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::dtos::AuthUserDto;
use crate::features::mentions::models::{CommentMention, MentionWithContext};

/// A mention as shown in the notification views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentionResponseDto {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub mentioned_user_id: Uuid,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Feedback item the comment belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_title: Option<String>,
    /// Sanitized body of the mentioning comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_by: Option<AuthUserDto>,
}

impl From<MentionWithContext> for MentionResponseDto {
    fn from(m: MentionWithContext) -> Self {
        Self {
            id: m.id,
            comment_id: m.comment_id,
            mentioned_user_id: m.mentioned_user_id,
            is_read: m.is_read,
            read_at: m.read_at,
            created_at: m.created_at,
            feedback_id: Some(m.feedback_id),
            feedback_title: Some(m.feedback_title),
            comment_body: Some(m.comment_body),
            mentioned_by: Some(AuthUserDto {
                id: m.mentioned_by_user_id,
                name: m.mentioned_by_name,
                email: m.mentioned_by_email,
                created_at: None,
            }),
        }
    }
}

impl From<CommentMention> for MentionResponseDto {
    fn from(m: CommentMention) -> Self {
        Self {
            id: m.id,
            comment_id: m.comment_id,
            mentioned_user_id: m.mentioned_user_id,
            is_read: m.is_read,
            read_at: m.read_at,
            created_at: m.created_at,
            feedback_id: None,
            feedback_title: None,
            comment_body: None,
            mentioned_by: None,
        }
    }
}

/// Per-user mention counters, computed fresh on every call
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentionStatsDto {
    pub total: i64,
    pub unread: i64,
    pub read: i64,
}
