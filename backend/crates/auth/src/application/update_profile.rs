//! Update Profile Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::profile::ProfileChanges;
use crate::error::{AuthError, AuthResult};

/// Raw profile fields; `None` means "not sent"
#[derive(Default)]
pub struct UpdateProfileInput {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId, input: UpdateProfileInput) -> AuthResult<User> {
        let changes = ProfileChanges::new(
            input.display_name.as_deref(),
            input.bio.as_deref(),
            input.avatar_url.as_deref(),
        )?;

        let mut user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.apply_profile(changes) {
            self.user_repo.update_profile(&user).await?;
            tracing::info!(user_id = %user.user_id, "Profile updated");
        }

        Ok(user)
    }
}
