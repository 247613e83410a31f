//! Register Use Case
//!
//! Creates a new account and signs the caller in.

use std::sync::Arc;

use chrono::Utc;
use kernel::error::app_error::AppError;

use crate::application::config::AuthConfig;
use crate::application::token::{AccessToken, issue_access_token};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    profile::validate_display_name,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input (raw request fields)
pub struct RegisterInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// A signed-in user together with their token
pub struct SessionOutput {
    pub token: AccessToken,
    pub user: User,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<SessionOutput> {
        let user_name = UserName::new(&input.user_name)
            .map_err(|e| AppError::bad_request(e.to_string()))?;
        let email = Email::new(&input.email)?;
        let display_name = validate_display_name(input.display_name.as_deref())?;
        let raw_password = RawPassword::new(input.password)?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new(user_name, email, password, display_name);

        // Races past the checks above are caught by the unique constraints
        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        let token = issue_access_token(&self.config, user.user_id, Utc::now().timestamp_millis());
        Ok(SessionOutput { token, user })
    }
}
