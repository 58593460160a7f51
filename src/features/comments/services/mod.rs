mod comment_service;
pub mod mention_extractor;

pub use comment_service::CommentService;
