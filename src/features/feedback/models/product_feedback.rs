use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Feedback row joined with its author's public columns
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
}
