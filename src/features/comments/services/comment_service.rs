use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::comments::dtos::{
    CommentDetailDto, CommentResponseDto, CommentTreeDto, CreateCommentDto, ListCommentsQuery,
};
use crate::features::comments::models::CommentWithAuthor;
use crate::features::comments::services::mention_extractor::extract_mention_names;
use crate::features::mentions::services::{dedup_user_ids, MentionService};
use crate::shared::sanitize::sanitize_html;

const COMMENT_COLUMNS: &str = r#"
    c.id, c.product_feedback_id, c.user_id, c.body, c.parent_id, c.created_at,
    u.name AS author_name, u.email AS author_email
"#;

/// Persistence and tree assembly for threaded comments.
pub struct CommentService {
    pool: PgPool,
    mentions: Arc<MentionService>,
}

impl CommentService {
    pub fn new(pool: PgPool, mentions: Arc<MentionService>) -> Self {
        Self { pool, mentions }
    }

    /// Create a comment, resolving mentions and writing the ledger entries
    /// in the same transaction as the comment row.
    pub async fn create(
        &self,
        feedback_id: Uuid,
        author_id: Uuid,
        dto: CreateCommentDto,
    ) -> Result<CommentResponseDto> {
        self.ensure_feedback_exists(feedback_id).await?;

        if let Some(parent_id) = dto.parent_id {
            // The FK alone cannot express "parent belongs to the same
            // feedback item"; reject structural violations here.
            let parent_ok = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM product_feedback_comments
                    WHERE id = $1 AND product_feedback_id = $2
                )
                "#,
            )
            .bind(parent_id)
            .bind(feedback_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

            if !parent_ok {
                return Err(AppError::NotFound(
                    "Parent comment not found for this feedback".to_string(),
                ));
            }
        }

        // Mentions are resolved from the sanitized body: what gets stored is
        // what readers will see.
        let body = sanitize_html(&dto.body);
        let mentioned_user_ids = self.resolve_mentions(&body).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let comment = sqlx::query_as::<_, CommentWithAuthor>(&format!(
            r#"
            WITH inserted AS (
                INSERT INTO product_feedback_comments
                    (product_feedback_id, user_id, body, parent_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, product_feedback_id, user_id, body, parent_id, created_at
            )
            SELECT {COMMENT_COLUMNS}
            FROM inserted c
            JOIN users u ON u.id = c.user_id
            "#
        ))
        .bind(feedback_id)
        .bind(author_id)
        .bind(&body)
        .bind(dto.parent_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment: {:?}", e);
            AppError::Database(e)
        })?;

        self.mentions
            .record_mentions(&mut tx, comment.id, &mentioned_user_ids, author_id)
            .await?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::info!(
            "Comment created: id={}, feedback={}, mentions={}",
            comment.id,
            feedback_id,
            mentioned_user_ids.len()
        );

        Ok(CommentResponseDto::from_row(
            &comment,
            dedup_user_ids(&mentioned_user_ids),
        ))
    }

    /// List root comments newest first, each carrying its reply subtree to
    /// the requested depth. Returns the page plus the total root count.
    pub async fn list(
        &self,
        feedback_id: Uuid,
        query: &ListCommentsQuery,
    ) -> Result<(Vec<CommentTreeDto>, i64)> {
        self.ensure_feedback_exists(feedback_id).await?;

        let comments = self.fetch_all_for_feedback(feedback_id).await?;
        let mentions = self.mentions_by_comment(&comments).await?;

        let mut forest = CommentTreeDto::build_forest(&comments, &mentions);
        let total = forest.len() as i64;

        if let Some(depth) = query.depth {
            for root in &mut forest {
                root.trim_to_depth(depth);
            }
        }

        let offset = query.offset().min(total) as usize;
        let end = (offset + query.limit() as usize).min(forest.len());
        let page = forest.drain(..end).skip(offset).collect();

        Ok((page, total))
    }

    /// Fetch one comment with its immediate parent and its reply subtree.
    pub async fn get(&self, feedback_id: Uuid, comment_id: Uuid) -> Result<CommentDetailDto> {
        let comments = self.fetch_all_for_feedback(feedback_id).await?;

        let root = comments
            .iter()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| {
                AppError::NotFound("Comment not found for this feedback".to_string())
            })?;

        let mentions = self.mentions_by_comment(&comments).await?;

        let parent = root.parent_id.and_then(|pid| {
            comments.iter().find(|c| c.id == pid).map(|p| {
                CommentResponseDto::from_row(p, mentions.get(&p.id).cloned().unwrap_or_default())
            })
        });

        Ok(CommentDetailDto {
            comment: CommentTreeDto::build_subtree(root, &comments, &mentions),
            parent,
        })
    }

    async fn ensure_feedback_exists(&self, feedback_id: Uuid) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM product_feedbacks WHERE id = $1)",
        )
        .bind(feedback_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if !exists {
            return Err(AppError::NotFound("Product feedback not found".to_string()));
        }
        Ok(())
    }

    async fn fetch_all_for_feedback(&self, feedback_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        sqlx::query_as::<_, CommentWithAuthor>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM product_feedback_comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.product_feedback_id = $1
            ORDER BY c.created_at
            "#
        ))
        .bind(feedback_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn mentions_by_comment(
        &self,
        comments: &[CommentWithAuthor],
    ) -> Result<HashMap<Uuid, Vec<Uuid>>> {
        let ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();
        self.mentions.mentioned_ids_for_comments(&ids).await
    }

    /// Resolve `[Name]` tokens in sanitized text to user ids, in order of
    /// appearance. Unmatched names are dropped silently; a name shared by
    /// several users resolves to the oldest account.
    async fn resolve_mentions(&self, sanitized_body: &str) -> Result<Vec<Uuid>> {
        let names = extract_mention_names(sanitized_body);
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

        let rows = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT id, LOWER(name)
            FROM users
            WHERE LOWER(name) = ANY($1)
            ORDER BY created_at
            "#,
        )
        .bind(&lowered)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        // First match wins for duplicate display names.
        let mut by_name: HashMap<String, Uuid> = HashMap::new();
        for (id, name) in rows {
            by_name.entry(name).or_insert(id);
        }

        Ok(lowered
            .iter()
            .filter_map(|n| by_name.get(n).copied())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    async fn insert_feedback(pool: &PgPool, user_id: Uuid) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO product_feedbacks (user_id, title, description, category)
            VALUES ($1, 'Add dark mode', 'please', 'feature')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn comment_service(pool: PgPool) -> CommentService {
        CommentService::new(pool.clone(), Arc::new(MentionService::new(pool)))
    }

    #[sqlx::test]
    async fn test_reply_with_parent_from_other_feedback_is_rejected(pool: PgPool) {
        let service = comment_service(pool.clone());
        let author = insert_user(&pool, "Alice", "alice@example.com").await;
        let feedback_a = insert_feedback(&pool, author).await;
        let feedback_b = insert_feedback(&pool, author).await;

        let root = service
            .create(
                feedback_a,
                author,
                CreateCommentDto {
                    body: "root comment".to_string(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();

        let err = service
            .create(
                feedback_b,
                author,
                CreateCommentDto {
                    body: "cross-tree reply".to_string(),
                    parent_id: Some(root.id),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // The same parent is fine under its own feedback item.
        let reply = service
            .create(
                feedback_a,
                author,
                CreateCommentDto {
                    body: "in-tree reply".to_string(),
                    parent_id: Some(root.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(reply.parent_id, Some(root.id));
    }

    #[sqlx::test]
    async fn test_created_comment_carries_one_mention_per_unique_user(pool: PgPool) {
        let service = comment_service(pool.clone());
        let author = insert_user(&pool, "Alice", "alice@example.com").await;
        let bob = insert_user(&pool, "Bob", "bob@example.com").await;
        let feedback_id = insert_feedback(&pool, author).await;

        let comment = service
            .create(
                feedback_id,
                author,
                CreateCommentDto {
                    body: "I agree [Bob], really [bob]".to_string(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(comment.mentioned_user_ids, vec![bob]);

        let ledger = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comment_mentions WHERE comment_id = $1",
        )
        .bind(comment.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(ledger, 1);
    }
}
