use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment row joined with its author's public columns
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub product_feedback_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
}
