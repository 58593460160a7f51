use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers;
use crate::features::auth::services::{AuthService, TokenService};

/// Routes that must stay outside the auth middleware
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .with_state(service)
}

/// Routes behind the bearer-token middleware
pub fn protected_routes(tokens: Arc<TokenService>) -> Router {
    Router::new()
        .route("/api/user", get(handlers::current_user))
        .route("/api/logout", post(handlers::logout))
        .route("/api/logout-all", post(handlers::logout_all))
        .with_state(tokens)
}
