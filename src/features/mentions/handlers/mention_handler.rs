use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::models::AuthenticatedUser;
use crate::features::mentions::dtos::{MentionResponseDto, MentionStatsDto};
use crate::features::mentions::services::MentionService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List the authenticated user's mentions
#[utoipa::path(
    get,
    path = "/api/mentions",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated mentions, newest first", body = ApiResponse<Vec<MentionResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "mentions"
)]
pub async fn list_mentions(
    user: AuthenticatedUser,
    State(service): State<Arc<MentionService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<MentionResponseDto>>>> {
    let (mentions, total) = service.list(user.id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(mentions),
        None,
        Some(Meta { total }),
    )))
}

/// List the authenticated user's unread mentions
#[utoipa::path(
    get,
    path = "/api/mentions/unread",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated unread mentions, newest first", body = ApiResponse<Vec<MentionResponseDto>>),
    ),
    security(("bearer_auth" = [])),
    tag = "mentions"
)]
pub async fn unread_mentions(
    user: AuthenticatedUser,
    State(service): State<Arc<MentionService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<MentionResponseDto>>>> {
    let (mentions, total) = service.unread(user.id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(mentions),
        None,
        Some(Meta { total }),
    )))
}

/// Mention counters for the authenticated user
#[utoipa::path(
    get,
    path = "/api/mentions/stats",
    responses(
        (status = 200, description = "Mention counters", body = ApiResponse<MentionStatsDto>),
    ),
    security(("bearer_auth" = [])),
    tag = "mentions"
)]
pub async fn mention_stats(
    user: AuthenticatedUser,
    State(service): State<Arc<MentionService>>,
) -> Result<Json<ApiResponse<MentionStatsDto>>> {
    let stats = service.stats(user.id).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// Get a single mention
#[utoipa::path(
    get,
    path = "/api/mentions/{id}",
    params(
        ("id" = Uuid, Path, description = "Mention ID")
    ),
    responses(
        (status = 200, description = "Mention found", body = ApiResponse<MentionResponseDto>),
        (status = 403, description = "Mention belongs to another user"),
        (status = 404, description = "Mention not found")
    ),
    security(("bearer_auth" = [])),
    tag = "mentions"
)]
pub async fn get_mention(
    user: AuthenticatedUser,
    State(service): State<Arc<MentionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MentionResponseDto>>> {
    let mention = service.get(id, user.id).await?;
    Ok(Json(ApiResponse::success(Some(mention), None, None)))
}

/// Mark a mention as read
#[utoipa::path(
    patch,
    path = "/api/mentions/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Mention ID")
    ),
    responses(
        (status = 200, description = "Mention marked as read", body = ApiResponse<MentionResponseDto>),
        (status = 403, description = "Mention belongs to another user"),
        (status = 404, description = "Mention not found")
    ),
    security(("bearer_auth" = [])),
    tag = "mentions"
)]
pub async fn mark_mention_read(
    user: AuthenticatedUser,
    State(service): State<Arc<MentionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MentionResponseDto>>> {
    let mention = service.mark_read(id, user.id).await?;
    Ok(Json(ApiResponse::success(
        Some(mention),
        Some("Mention marked as read".to_string()),
        None,
    )))
}

/// Mark all of the user's mentions as read
#[utoipa::path(
    post,
    path = "/api/mentions/mark-all-read",
    responses(
        (status = 200, description = "All mentions marked as read"),
    ),
    security(("bearer_auth" = [])),
    tag = "mentions"
)]
pub async fn mark_all_mentions_read(
    user: AuthenticatedUser,
    State(service): State<Arc<MentionService>>,
) -> Result<Json<ApiResponse<()>>> {
    let updated = service.mark_all_read(user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(format!("Marked {} mentions as read", updated)),
        None,
    )))
}
