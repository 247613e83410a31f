//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod login;
pub mod register;
pub mod token;
pub mod update_profile;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase, SessionOutput};
pub use token::{AccessToken, TokenClaims, issue_access_token, verify_access_token};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
