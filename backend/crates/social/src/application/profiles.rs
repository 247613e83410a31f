//! Profile Use Cases
//!
//! Public profiles with follower/following/post counters and user search.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::SocialConfig;
use crate::domain::entities::{UserProfile, UserSummary};
use crate::domain::repository::UserDirectory;
use crate::domain::value_objects::{Page, SearchTerm};
use crate::error::{SocialError, SocialResult};

pub struct ProfileUseCase<R>
where
    R: UserDirectory,
{
    repo: Arc<R>,
    config: Arc<SocialConfig>,
}

impl<R> ProfileUseCase<R>
where
    R: UserDirectory,
{
    pub fn new(repo: Arc<R>, config: Arc<SocialConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn get_by_id(
        &self,
        user_id: UserId,
        viewer: Option<UserId>,
    ) -> SocialResult<UserProfile> {
        self.repo
            .find_profile(user_id, viewer)
            .await?
            .ok_or(SocialError::UserNotFound)
    }

    /// User names are stored lowercase, so the lookup is case-insensitive
    pub async fn get_by_name(
        &self,
        user_name: &str,
        viewer: Option<UserId>,
    ) -> SocialResult<UserProfile> {
        let canonical = user_name.trim().to_lowercase();
        self.repo
            .find_profile_by_name(&canonical, viewer)
            .await?
            .ok_or(SocialError::UserNotFound)
    }

    pub async fn search(&self, query: &str, page: Page) -> SocialResult<Vec<UserSummary>> {
        let term = SearchTerm::new(query, &self.config)?;
        self.repo.search_users(&term, page).await
    }
}
