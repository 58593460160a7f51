mod mention_service;

pub use mention_service::{dedup_user_ids, MentionService};
