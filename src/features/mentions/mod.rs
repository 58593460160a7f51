//! Mention notification ledger.
//!
//! One record per (comment, mentioned user) pair, written atomically with
//! the comment. Records are never edited except by the mentioned user's
//! mark-read action, and they cascade away with the comment.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::MentionService;
