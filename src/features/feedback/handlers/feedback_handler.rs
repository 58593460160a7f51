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
use crate::features::feedback::dtos::{
    CreateFeedbackDto, FeedbackDetailDto, FeedbackResponseDto, UpdateFeedbackDto,
};
use crate::features::feedback::services::FeedbackService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List feedback items, newest first
#[utoipa::path(
    get,
    path = "/api/product-feedbacks",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated feedback items", body = ApiResponse<Vec<FeedbackResponseDto>>),
    ),
    tag = "feedback"
)]
pub async fn list_feedbacks(
    State(service): State<Arc<FeedbackService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FeedbackResponseDto>>>> {
    let (feedbacks, total) = service.list(&pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(feedbacks),
        None,
        Some(Meta { total }),
    )))
}

/// Submit a feedback item
#[utoipa::path(
    post,
    path = "/api/product-feedbacks",
    request_body = CreateFeedbackDto,
    responses(
        (status = 201, description = "Feedback created successfully", body = ApiResponse<FeedbackResponseDto>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "feedback"
)]
pub async fn create_feedback(
    user: AuthenticatedUser,
    State(service): State<Arc<FeedbackService>>,
    AppJson(dto): AppJson<CreateFeedbackDto>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let feedback = service.create(user.id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(feedback),
            Some("Product feedback created successfully".to_string()),
            None,
        )),
    ))
}

/// Get a feedback item with its root-comment trees
#[utoipa::path(
    get,
    path = "/api/product-feedbacks/{id}",
    params(
        ("id" = Uuid, Path, description = "Feedback item ID")
    ),
    responses(
        (status = 200, description = "Feedback found", body = ApiResponse<FeedbackDetailDto>),
        (status = 404, description = "Feedback not found")
    ),
    security(("bearer_auth" = [])),
    tag = "feedback"
)]
pub async fn get_feedback(
    State(service): State<Arc<FeedbackService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FeedbackDetailDto>>> {
    let feedback = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(feedback), None, None)))
}

/// Update a feedback item (author only, partial fields)
#[utoipa::path(
    put,
    path = "/api/product-feedbacks/{id}",
    params(
        ("id" = Uuid, Path, description = "Feedback item ID")
    ),
    request_body = UpdateFeedbackDto,
    responses(
        (status = 200, description = "Feedback updated successfully", body = ApiResponse<FeedbackResponseDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Feedback not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "feedback"
)]
pub async fn update_feedback(
    user: AuthenticatedUser,
    State(service): State<Arc<FeedbackService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFeedbackDto>,
) -> Result<Json<ApiResponse<FeedbackResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let feedback = service.update(id, user.id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(feedback),
        Some("Product feedback updated successfully".to_string()),
        None,
    )))
}

/// Delete a feedback item (author only, cascades to comments and mentions)
#[utoipa::path(
    delete,
    path = "/api/product-feedbacks/{id}",
    params(
        ("id" = Uuid, Path, description = "Feedback item ID")
    ),
    responses(
        (status = 200, description = "Feedback deleted successfully"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Feedback not found")
    ),
    security(("bearer_auth" = [])),
    tag = "feedback"
)]
pub async fn delete_feedback(
    user: AuthenticatedUser,
    State(service): State<Arc<FeedbackService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id, user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Product feedback deleted successfully".to_string()),
        None,
    )))
}
