use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

/// Public read routes for comment trees
pub fn public_routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/product-feedbacks/{id}/comments",
            get(handlers::list_comments),
        )
        .route(
            "/api/product-feedbacks/{id}/comments/{comment_id}",
            get(handlers::get_comment),
        )
        .with_state(service)
}

/// Comment creation requires authentication
pub fn protected_routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/product-feedbacks/{id}/comments",
            post(handlers::create_comment),
        )
        .with_state(service)
}
