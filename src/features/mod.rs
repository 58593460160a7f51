pub mod auth;
pub mod comments;
pub mod feedback;
pub mod mentions;
