//! Social Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, read models, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Posts with optional image URL, editable and deletable by the author
//! - Comments, deletable by their author or the post author
//! - Like and follow toggles
//! - A feed of the caller's posts and posts from followed users
//! - Notifications for likes, comments and follows (never for self-actions)
//! - Public profiles with counters, and user search
//!
//! Identity comes from the `auth` crate's middleware; this crate only reads
//! the `users` table.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::SocialConfig;
pub use domain::repository::SocialRepository;
pub use error::{SocialError, SocialResult};
pub use infra::postgres::PgSocialRepository;
pub use presentation::router::{social_router, social_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
