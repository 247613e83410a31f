//! Follow Use Cases

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::{Notification, UserSummary};
use crate::domain::repository::{FollowRepository, NotificationRepository, UserDirectory};
use crate::domain::value_objects::Page;
use crate::error::{SocialError, SocialResult};

/// State after a follow toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowToggle {
    pub following: bool,
    pub follower_count: i64,
}

/// Follow use cases
pub struct FollowUseCase<R>
where
    R: FollowRepository + NotificationRepository + UserDirectory,
{
    repo: Arc<R>,
}

impl<R> FollowUseCase<R>
where
    R: FollowRepository + NotificationRepository + UserDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Unfollow if already following, otherwise follow
    pub async fn toggle(&self, follower_id: UserId, target_id: UserId) -> SocialResult<FollowToggle> {
        if follower_id == target_id {
            return Err(SocialError::SelfFollow);
        }
        self.ensure_user(target_id).await?;

        let following = if self.repo.remove_follow(follower_id, target_id).await? {
            false
        } else {
            if self.repo.insert_follow(follower_id, target_id).await? {
                if let Some(notification) = Notification::for_follow(target_id, follower_id) {
                    self.repo.insert_notification(&notification).await?;
                }
            }
            true
        };

        let follower_count = self.repo.count_followers(target_id).await?;

        tracing::info!(
            follower_id = %follower_id,
            following_id = %target_id,
            following,
            "Follow toggled"
        );

        Ok(FollowToggle {
            following,
            follower_count,
        })
    }

    pub async fn followers(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>> {
        self.ensure_user(user_id).await?;
        self.repo.list_followers(user_id, page).await
    }

    pub async fn following(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>> {
        self.ensure_user(user_id).await?;
        self.repo.list_following(user_id, page).await
    }

    async fn ensure_user(&self, user_id: UserId) -> SocialResult<()> {
        match self.repo.find_user_summary(user_id).await? {
            Some(_) => Ok(()),
            None => Err(SocialError::UserNotFound),
        }
    }
}
