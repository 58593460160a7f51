use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::comments::dtos::ListCommentsQuery;
use crate::features::comments::services::CommentService;
use crate::features::feedback::dtos::{
    CreateFeedbackDto, FeedbackDetailDto, FeedbackResponseDto, UpdateFeedbackDto,
};
use crate::features::feedback::models::FeedbackWithAuthor;
use crate::shared::constants::COMMENT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

const FEEDBACK_COLUMNS: &str = r#"
    f.id, f.user_id, f.title, f.description, f.category, f.created_at, f.updated_at,
    u.name AS author_name, u.email AS author_email
"#;

/// CRUD for feedback items. Tree assembly for the detail view is delegated
/// to the comment service.
pub struct FeedbackService {
    pool: PgPool,
    comments: Arc<CommentService>,
}

impl FeedbackService {
    pub fn new(pool: PgPool, comments: Arc<CommentService>) -> Self {
        Self { pool, comments }
    }

    /// Public listing, newest first.
    pub async fn list(
        &self,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<FeedbackResponseDto>, i64)> {
        let feedbacks = sqlx::query_as::<_, FeedbackWithAuthor>(&format!(
            r#"
            SELECT {FEEDBACK_COLUMNS}
            FROM product_feedbacks f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list product feedbacks: {:?}", e);
            AppError::Database(e)
        })?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product_feedbacks")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((feedbacks.into_iter().map(|f| f.into()).collect(), total))
    }

    pub async fn create(&self, author_id: Uuid, dto: CreateFeedbackDto) -> Result<FeedbackResponseDto> {
        let feedback = sqlx::query_as::<_, FeedbackWithAuthor>(&format!(
            r#"
            WITH inserted AS (
                INSERT INTO product_feedbacks (user_id, title, description, category)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, title, description, category, created_at, updated_at
            )
            SELECT {FEEDBACK_COLUMNS}
            FROM inserted f
            JOIN users u ON u.id = f.user_id
            "#
        ))
        .bind(author_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create product feedback: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Product feedback created: id={}", feedback.id);

        Ok(feedback.into())
    }

    /// Detail view with the first page of root-comment trees attached.
    pub async fn get(&self, id: Uuid) -> Result<FeedbackDetailDto> {
        let feedback = self.fetch(id).await?;

        let (comments, _) = self
            .comments
            .list(
                id,
                &ListCommentsQuery {
                    page: 1,
                    page_size: COMMENT_PAGE_SIZE,
                    depth: None,
                },
            )
            .await?;

        Ok(FeedbackDetailDto {
            feedback: feedback.into(),
            comments,
        })
    }

    /// Partial update; only the owning author may mutate.
    pub async fn update(
        &self,
        id: Uuid,
        requesting_user_id: Uuid,
        dto: UpdateFeedbackDto,
    ) -> Result<FeedbackResponseDto> {
        let existing = self.fetch(id).await?;
        if existing.user_id != requesting_user_id {
            return Err(AppError::Forbidden(
                "Only the author can update this feedback".to_string(),
            ));
        }

        let feedback = sqlx::query_as::<_, FeedbackWithAuthor>(&format!(
            r#"
            WITH updated AS (
                UPDATE product_feedbacks
                SET title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    category = COALESCE($4, category),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING id, user_id, title, description, category, created_at, updated_at
            )
            SELECT {FEEDBACK_COLUMNS}
            FROM updated f
            JOIN users u ON u.id = f.user_id
            "#
        ))
        .bind(id)
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update product feedback: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(feedback.into())
    }

    /// Owner-only delete; comments and mention records cascade away.
    pub async fn delete(&self, id: Uuid, requesting_user_id: Uuid) -> Result<()> {
        let existing = self.fetch(id).await?;
        if existing.user_id != requesting_user_id {
            return Err(AppError::Forbidden(
                "Only the author can delete this feedback".to_string(),
            ));
        }

        sqlx::query("DELETE FROM product_feedbacks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        tracing::info!("Product feedback deleted: id={}", id);

        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<FeedbackWithAuthor> {
        sqlx::query_as::<_, FeedbackWithAuthor>(&format!(
            r#"
            SELECT {FEEDBACK_COLUMNS}
            FROM product_feedbacks f
            JOIN users u ON u.id = f.user_id
            WHERE f.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Product feedback not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::comments::dtos::CreateCommentDto;
    use crate::features::mentions::services::MentionService;

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

    fn services(pool: PgPool) -> (FeedbackService, Arc<CommentService>) {
        let comments = Arc::new(CommentService::new(
            pool.clone(),
            Arc::new(MentionService::new(pool.clone())),
        ));
        (
            FeedbackService::new(pool, Arc::clone(&comments)),
            comments,
        )
    }

    #[sqlx::test]
    async fn test_deleting_feedback_cascades_to_comments_and_mentions(pool: PgPool) {
        let (feedbacks, comments) = services(pool.clone());
        let author = insert_user(&pool, "Alice", "alice@example.com").await;
        let bob = insert_user(&pool, "Bob", "bob@example.com").await;

        let feedback = feedbacks
            .create(
                author,
                CreateFeedbackDto {
                    title: "Add dark mode".to_string(),
                    description: "please".to_string(),
                    category: "feature".to_string(),
                },
            )
            .await
            .unwrap();

        let root = comments
            .create(
                feedback.id,
                bob,
                CreateCommentDto {
                    body: "I agree [Bob]".to_string(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();
        comments
            .create(
                feedback.id,
                author,
                CreateCommentDto {
                    body: "replying".to_string(),
                    parent_id: Some(root.id),
                },
            )
            .await
            .unwrap();

        feedbacks.delete(feedback.id, author).await.unwrap();

        let remaining_comments =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product_feedback_comments")
                .fetch_one(&pool)
                .await
                .unwrap();
        let remaining_mentions =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comment_mentions")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(remaining_comments, 0);
        assert_eq!(remaining_mentions, 0);
    }

    #[sqlx::test]
    async fn test_only_the_author_may_delete(pool: PgPool) {
        let (feedbacks, _) = services(pool.clone());
        let author = insert_user(&pool, "Alice", "alice@example.com").await;
        let other = insert_user(&pool, "Bob", "bob@example.com").await;

        let feedback = feedbacks
            .create(
                author,
                CreateFeedbackDto {
                    title: "Add dark mode".to_string(),
                    description: "please".to_string(),
                    category: "feature".to_string(),
                },
            )
            .await
            .unwrap();

        let err = feedbacks.delete(feedback.id, other).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
