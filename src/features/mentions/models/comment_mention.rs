use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a mention ledger entry
#[derive(Debug, Clone, FromRow)]
pub struct CommentMention {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub mentioned_user_id: Uuid,
    pub mentioned_by_user_id: Uuid,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Ledger entry joined with the comment, its feedback item, and the
/// mentioning user, for notification views
#[derive(Debug, Clone, FromRow)]
pub struct MentionWithContext {
    pub id: Uuid,
    pub comment_id: Uuid,
    pub mentioned_user_id: Uuid,
    pub mentioned_by_user_id: Uuid,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub feedback_id: Uuid,
    pub feedback_title: String,
    pub comment_body: String,
    pub mentioned_by_name: String,
    pub mentioned_by_email: String,
}
