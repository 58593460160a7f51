use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::comments::dtos::{
    CommentDetailDto, CommentResponseDto, CommentTreeDto, CreateCommentDto, ListCommentsQuery,
};
use crate::features::comments::services::CommentService;
use crate::shared::types::{ApiResponse, Meta};

/// List root comments of a feedback item with nested replies
#[utoipa::path(
    get,
    path = "/api/product-feedbacks/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Feedback item ID"),
        ListCommentsQuery
    ),
    responses(
        (status = 200, description = "Paginated comment trees, newest root first", body = ApiResponse<Vec<CommentTreeDto>>),
        (status = 404, description = "Feedback item not found")
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(service): State<Arc<CommentService>>,
    Path(feedback_id): Path<Uuid>,
    Query(query): Query<ListCommentsQuery>,
) -> Result<Json<ApiResponse<Vec<CommentTreeDto>>>> {
    let (comments, total) = service.list(feedback_id, &query).await?;
    Ok(Json(ApiResponse::success(
        Some(comments),
        None,
        Some(Meta { total }),
    )))
}

/// Create a comment (root or reply) on a feedback item
#[utoipa::path(
    post,
    path = "/api/product-feedbacks/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Feedback item ID")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created successfully", body = ApiResponse<CommentResponseDto>),
        (status = 404, description = "Feedback item or parent comment not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "comments"
)]
pub async fn create_comment(
    user: AuthenticatedUser,
    State(service): State<Arc<CommentService>>,
    Path(feedback_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = service.create(feedback_id, user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(comment),
            Some("Comment created successfully".to_string()),
            None,
        )),
    ))
}

/// Get a single comment with its parent and reply subtree
#[utoipa::path(
    get,
    path = "/api/product-feedbacks/{id}/comments/{comment_id}",
    params(
        ("id" = Uuid, Path, description = "Feedback item ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comment found", body = ApiResponse<CommentDetailDto>),
        (status = 404, description = "Comment not found for this feedback")
    ),
    tag = "comments"
)]
pub async fn get_comment(
    State(service): State<Arc<CommentService>>,
    Path((feedback_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<CommentDetailDto>>> {
    let comment = service.get(feedback_id, comment_id).await?;
    Ok(Json(ApiResponse::success(Some(comment), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::comments::routes;
    use crate::features::mentions::services::MentionService;
    use crate::shared::test_helpers::with_test_auth;
    use axum_test::TestServer;
    use serde_json::json;

    // Lazy pool: validation failures are rejected before any query runs, so
    // these tests never touch a database.
    fn comment_service() -> Arc<CommentService> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unreachable")
            .unwrap();
        Arc::new(CommentService::new(
            pool.clone(),
            Arc::new(MentionService::new(pool)),
        ))
    }

    #[tokio::test]
    async fn test_create_comment_rejects_empty_body() {
        let app = with_test_auth(routes::protected_routes(comment_service()));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post(&format!("/api/product-feedbacks/{}/comments", Uuid::new_v4()))
            .json(&json!({ "body": "" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_comment_rejects_malformed_json() {
        let app = with_test_auth(routes::protected_routes(comment_service()));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post(&format!("/api/product-feedbacks/{}/comments", Uuid::new_v4()))
            .content_type("application/json")
            .text("not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
