//! Registration, login and opaque bearer-token auth.
//!
//! Tokens are issued at register/login, stored as SHA-256 digests, and
//! revoked by logout (current token) or logout-all (every token the user
//! holds). Login revokes all existing tokens before issuing a fresh one.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AuthService, TokenService};
