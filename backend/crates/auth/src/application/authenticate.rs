//! Authenticate Use Case
//!
//! Resolves a bearer token to the user it was issued for.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::token::verify_access_token;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Authenticate use case
pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// A valid signature for a deleted account is still rejected
    pub async fn execute(&self, token: &str) -> AuthResult<User> {
        let claims = verify_access_token(&self.config, token, Utc::now().timestamp_millis())?;

        self.user_repo
            .find_by_id(&claims.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}
