use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::mentions::dtos::{MentionResponseDto, MentionStatsDto};
use crate::features::mentions::models::{CommentMention, MentionWithContext};
use crate::shared::types::PaginationQuery;

const MENTION_CONTEXT_QUERY: &str = r#"
    SELECT m.id, m.comment_id, m.mentioned_user_id, m.mentioned_by_user_id,
           m.is_read, m.read_at, m.created_at,
           f.id AS feedback_id, f.title AS feedback_title,
           c.body AS comment_body,
           u.name AS mentioned_by_name, u.email AS mentioned_by_email
    FROM comment_mentions m
    JOIN product_feedback_comments c ON c.id = m.comment_id
    JOIN product_feedbacks f ON f.id = c.product_feedback_id
    JOIN users u ON u.id = m.mentioned_by_user_id
"#;

/// The mention notification ledger.
pub struct MentionService {
    pool: PgPool,
}

impl MentionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record one ledger entry per unique mentioned user, inside the
    /// caller's transaction.
    ///
    /// Idempotent: re-processing a comment neither duplicates records nor
    /// errors, thanks to the (comment_id, mentioned_user_id) uniqueness.
    /// Self-mentions are recorded like any other.
    pub async fn record_mentions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment_id: Uuid,
        mentioned_user_ids: &[Uuid],
        mentioned_by_user_id: Uuid,
    ) -> Result<()> {
        for user_id in dedup_user_ids(mentioned_user_ids) {
            sqlx::query(
                r#"
                INSERT INTO comment_mentions (comment_id, mentioned_user_id, mentioned_by_user_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (comment_id, mentioned_user_id) DO NOTHING
                "#,
            )
            .bind(comment_id)
            .bind(user_id)
            .bind(mentioned_by_user_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record mention: {:?}", e);
                AppError::Database(e)
            })?;
        }

        Ok(())
    }

    /// Mentioned user ids per comment, for deriving a comment's mention list
    /// from the ledger.
    pub async fn mentioned_ids_for_comments(
        &self,
        comment_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
            r#"
            SELECT comment_id, mentioned_user_id
            FROM comment_mentions
            WHERE comment_id = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(comment_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (comment_id, user_id) in rows {
            map.entry(comment_id).or_default().push(user_id);
        }
        Ok(map)
    }

    /// All mentions of a user, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<MentionResponseDto>, i64)> {
        self.list_filtered(user_id, pagination, false).await
    }

    /// Unread mentions of a user, newest first.
    pub async fn unread(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<MentionResponseDto>, i64)> {
        self.list_filtered(user_id, pagination, true).await
    }

    async fn list_filtered(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
        unread_only: bool,
    ) -> Result<(Vec<MentionResponseDto>, i64)> {
        let filter = if unread_only {
            "WHERE m.mentioned_user_id = $1 AND m.is_read = FALSE"
        } else {
            "WHERE m.mentioned_user_id = $1"
        };

        let mentions = sqlx::query_as::<_, MentionWithContext>(&format!(
            "{MENTION_CONTEXT_QUERY} {filter} ORDER BY m.created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list mentions: {:?}", e);
            AppError::Database(e)
        })?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM comment_mentions m {filter}"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok((mentions.into_iter().map(|m| m.into()).collect(), total))
    }

    /// Fetch a single mention; only the mentioned user may see it.
    pub async fn get(&self, mention_id: Uuid, requesting_user_id: Uuid) -> Result<MentionResponseDto> {
        let mention = sqlx::query_as::<_, MentionWithContext>(&format!(
            "{MENTION_CONTEXT_QUERY} WHERE m.id = $1"
        ))
        .bind(mention_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Mention not found".to_string()))?;

        if mention.mentioned_user_id != requesting_user_id {
            return Err(AppError::Forbidden(
                "This mention belongs to another user".to_string(),
            ));
        }

        Ok(mention.into())
    }

    /// Mark one mention read. Only the mentioned user may do this; marking
    /// an already-read record again is a no-op.
    pub async fn mark_read(
        &self,
        mention_id: Uuid,
        requesting_user_id: Uuid,
    ) -> Result<MentionResponseDto> {
        let mention = sqlx::query_as::<_, CommentMention>(
            r#"
            SELECT id, comment_id, mentioned_user_id, mentioned_by_user_id,
                   is_read, read_at, created_at
            FROM comment_mentions
            WHERE id = $1
            "#,
        )
        .bind(mention_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Mention not found".to_string()))?;

        if mention.mentioned_user_id != requesting_user_id {
            return Err(AppError::Forbidden(
                "This mention belongs to another user".to_string(),
            ));
        }

        // COALESCE keeps the original read timestamp on repeated calls.
        let updated = sqlx::query_as::<_, CommentMention>(
            r#"
            UPDATE comment_mentions
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING id, comment_id, mentioned_user_id, mentioned_by_user_id,
                      is_read, read_at, created_at
            "#,
        )
        .bind(mention_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(updated.into())
    }

    /// Mark every unread mention of a user read, returning the count.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE comment_mentions
            SET is_read = TRUE, read_at = NOW()
            WHERE mentioned_user_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    /// Counters for the notification badge, computed fresh per call.
    pub async fn stats(&self, user_id: Uuid) -> Result<MentionStatsDto> {
        let (total, unread, read) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE is_read = FALSE),
                   COUNT(*) FILTER (WHERE is_read = TRUE)
            FROM comment_mentions
            WHERE mentioned_user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(MentionStatsDto {
            total,
            unread,
            read,
        })
    }
}

/// First-appearance de-duplication, preserving order.
///
/// Shared by the ledger write and the comment response, so both report the
/// same set of mentioned users.
pub fn dedup_user_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for &id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_appearance_order() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        assert_eq!(dedup_user_ids(&[b, a, b, c, a, b]), vec![b, a, c]);
    }

    #[test]
    fn test_dedup_empty_input() {
        assert!(dedup_user_ids(&[]).is_empty());
    }

    #[test]
    fn test_dedup_passes_unique_input_through() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        assert_eq!(dedup_user_ids(&[a, b]), vec![a, b]);
    }

    async fn insert_user(pool: &PgPool, name: &str, email: &str) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
        )
        .bind(name)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn insert_comment(pool: &PgPool, user_id: Uuid) -> Uuid {
        let feedback_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO product_feedbacks (user_id, title, description, category)
            VALUES ($1, 'Add dark mode', 'please', 'feature')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO product_feedback_comments (product_feedback_id, user_id, body)
            VALUES ($1, $2, 'I agree [Bob]')
            RETURNING id
            "#,
        )
        .bind(feedback_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn test_record_mentions_stores_one_record_per_unique_user(pool: PgPool) {
        let service = MentionService::new(pool.clone());
        let author = insert_user(&pool, "Alice", "alice@example.com").await;
        let bob = insert_user(&pool, "Bob", "bob@example.com").await;
        let comment_id = insert_comment(&pool, author).await;

        let mut tx = pool.begin().await.unwrap();
        service
            .record_mentions(&mut tx, comment_id, &[bob, bob, bob], author)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        // Re-processing the same comment must neither duplicate nor error.
        let mut tx = pool.begin().await.unwrap();
        service
            .record_mentions(&mut tx, comment_id, &[bob], author)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comment_mentions WHERE comment_id = $1 AND mentioned_user_id = $2",
        )
        .bind(comment_id)
        .bind(bob)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);

        let record = sqlx::query_as::<_, CommentMention>(
            r#"
            SELECT id, comment_id, mentioned_user_id, mentioned_by_user_id,
                   is_read, read_at, created_at
            FROM comment_mentions
            WHERE comment_id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(!record.is_read);
        assert_eq!(record.mentioned_by_user_id, author);
    }
}
