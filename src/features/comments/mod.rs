//! Threaded comments on feedback items.
//!
//! Comments form a tree through a self-referential `parent_id`; depth is
//! unbounded. Creation is the entry point of the mention pipeline: the body
//! is sanitized, bracketed `[Name]` tokens are resolved to users, and the
//! comment plus its mention ledger entries commit in a single transaction.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CommentService;
