mod comment_mention;

pub use comment_mention::{CommentMention, MentionWithContext};
