//! Product feedback items: the aggregate users comment on.
//!
//! Mutations are owner-only; deletion cascades through the comment tree and
//! the mention ledger. The detail view delegates tree assembly to the
//! comments feature.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::FeedbackService;
