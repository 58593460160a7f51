use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::mentions::handlers;
use crate::features::mentions::services::MentionService;

/// Notification routes; all require authentication.
///
/// Fixed segments are registered before `/{id}` so `/unread` and `/stats`
/// are not swallowed by the parameterized route.
pub fn routes(service: Arc<MentionService>) -> Router {
    Router::new()
        .route("/api/mentions", get(handlers::list_mentions))
        .route("/api/mentions/unread", get(handlers::unread_mentions))
        .route("/api/mentions/stats", get(handlers::mention_stats))
        .route(
            "/api/mentions/mark-all-read",
            post(handlers::mark_all_mentions_read),
        )
        .route("/api/mentions/{id}", get(handlers::get_mention))
        .route("/api/mentions/{id}/read", patch(handlers::mark_mention_read))
        .with_state(service)
}
