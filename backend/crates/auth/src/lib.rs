//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration with user name, email and password
//! - Login by user name or email
//! - Stateless HMAC-signed bearer tokens
//! - Profile edits (display name, bio, avatar URL)
//! - Identity middleware reused by the other route groups
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B length rules)
//! - Tokens signed with HMAC-SHA256 and checked in constant time
//! - Unknown user and wrong password give the same `401`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::{User, UserRepository};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{
    AuthMiddlewareState, CurrentUser, MaybeUser, attach_identity, require_auth,
};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
