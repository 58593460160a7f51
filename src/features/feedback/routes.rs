use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::feedback::handlers;
use crate::features::feedback::services::FeedbackService;

/// The public listing endpoint
pub fn public_routes(service: Arc<FeedbackService>) -> Router {
    Router::new()
        .route("/api/product-feedbacks", get(handlers::list_feedbacks))
        .with_state(service)
}

/// Everything else requires authentication; mutation is owner-only inside
/// the service.
pub fn protected_routes(service: Arc<FeedbackService>) -> Router {
    Router::new()
        .route("/api/product-feedbacks", post(handlers::create_feedback))
        .route(
            "/api/product-feedbacks/{id}",
            get(handlers::get_feedback)
                .put(handlers::update_feedback)
                .delete(handlers::delete_feedback),
        )
        .with_state(service)
}
