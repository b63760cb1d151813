//! HTTP identity and admin API for the Inkpress CMS
//!
//! Thin JSON wrappers over `inkpress-core`: authentication endpoints under
//! `/api/auth`, the admin roster and bulk operations under `/api/admin`.

pub mod admin_handlers;
pub mod auth_handlers;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

pub use errors::{AppError, AppResult};
pub use state::AppState;
