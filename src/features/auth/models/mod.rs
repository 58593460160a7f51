mod authenticated_user;
mod user;

pub use authenticated_user::AuthenticatedUser;
pub use user::User;
