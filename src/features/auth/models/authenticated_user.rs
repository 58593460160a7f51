use sqlx::FromRow;
use uuid::Uuid;

/// The user resolved from a bearer token, carried in request extensions.
///
/// `token_id` identifies the access token the request presented, so logout
/// can revoke exactly that token.
#[derive(Debug, Clone, FromRow)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token_id: Uuid,
}
