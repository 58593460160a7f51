use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AuthResponseDto, AuthUserDto, LoginDto, RegisterDto};
use crate::features::auth::models::AuthenticatedUser;
use crate::features::auth::services::{AuthService, TokenService};
use crate::shared::types::ApiResponse;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponseDto>),
        (status = 422, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(auth),
            Some("User registered successfully".to_string()),
            None,
        )),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 422, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth = service.login(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(auth),
        Some("Login successful".to_string()),
        None,
    )))
}

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<AuthUserDto>),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn current_user(user: AuthenticatedUser) -> Result<Json<ApiResponse<AuthUserDto>>> {
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Logout (revoke the presented token)
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out successfully"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout(
    user: AuthenticatedUser,
    State(tokens): State<Arc<TokenService>>,
) -> Result<Json<ApiResponse<()>>> {
    tokens.revoke(user.token_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Logged out successfully".to_string()),
        None,
    )))
}

/// Logout from all devices (revoke every token)
#[utoipa::path(
    post,
    path = "/api/logout-all",
    responses(
        (status = 200, description = "Logged out everywhere"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout_all(
    user: AuthenticatedUser,
    State(tokens): State<Arc<TokenService>>,
) -> Result<Json<ApiResponse<()>>> {
    let revoked = tokens.revoke_all(user.id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(format!(
            "Logged out from all devices ({} tokens revoked)",
            revoked
        )),
        None,
    )))
}
