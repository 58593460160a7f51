use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::feedback::{dtos as feedback_dtos, handlers as feedback_handlers};
use crate::features::mentions::{dtos as mentions_dtos, handlers as mentions_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::current_user,
        auth_handlers::logout,
        auth_handlers::logout_all,
        // Feedback
        feedback_handlers::list_feedbacks,
        feedback_handlers::create_feedback,
        feedback_handlers::get_feedback,
        feedback_handlers::update_feedback,
        feedback_handlers::delete_feedback,
        // Comments
        comments_handlers::list_comments,
        comments_handlers::create_comment,
        comments_handlers::get_comment,
        // Mentions
        mentions_handlers::list_mentions,
        mentions_handlers::unread_mentions,
        mentions_handlers::mention_stats,
        mentions_handlers::get_mention,
        mentions_handlers::mark_mention_read,
        mentions_handlers::mark_all_mentions_read,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_dtos::RegisterDto,
            auth_dtos::LoginDto,
            auth_dtos::AuthUserDto,
            auth_dtos::AuthResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::AuthUserDto>,
            // Feedback
            feedback_dtos::CreateFeedbackDto,
            feedback_dtos::UpdateFeedbackDto,
            feedback_dtos::FeedbackResponseDto,
            feedback_dtos::FeedbackDetailDto,
            ApiResponse<Vec<feedback_dtos::FeedbackResponseDto>>,
            ApiResponse<feedback_dtos::FeedbackResponseDto>,
            ApiResponse<feedback_dtos::FeedbackDetailDto>,
            // Comments
            comments_dtos::CreateCommentDto,
            comments_dtos::CommentResponseDto,
            comments_dtos::CommentTreeDto,
            comments_dtos::CommentDetailDto,
            ApiResponse<Vec<comments_dtos::CommentTreeDto>>,
            ApiResponse<comments_dtos::CommentResponseDto>,
            ApiResponse<comments_dtos::CommentDetailDto>,
            // Mentions
            mentions_dtos::MentionResponseDto,
            mentions_dtos::MentionStatsDto,
            ApiResponse<Vec<mentions_dtos::MentionResponseDto>>,
            ApiResponse<mentions_dtos::MentionResponseDto>,
            ApiResponse<mentions_dtos::MentionStatsDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token revocation"),
        (name = "feedback", description = "Product feedback items"),
        (name = "comments", description = "Threaded comments on feedback items"),
        (name = "mentions", description = "Mention notifications"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Pulseboard API",
        version = "0.1.0",
        description = "API documentation for the Pulseboard feedback service",
    )
)]
pub struct ApiDoc;

/// Adds the bearer security scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
