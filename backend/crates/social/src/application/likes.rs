//! Like Use Cases

use std::sync::Arc;

use kernel::id::{PostId, UserId};

use crate::domain::entities::{Notification, UserSummary};
use crate::domain::repository::{LikeRepository, NotificationRepository, PostRepository};
use crate::domain::value_objects::Page;
use crate::error::{SocialError, SocialResult};

/// State after a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
}

/// Like use cases
pub struct LikeUseCase<R>
where
    R: PostRepository + LikeRepository + NotificationRepository,
{
    repo: Arc<R>,
}

impl<R> LikeUseCase<R>
where
    R: PostRepository + LikeRepository + NotificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Unlike if a like exists, otherwise like.
    ///
    /// Only a newly written like notifies the author; unliking leaves
    /// earlier notifications in place.
    pub async fn toggle(&self, user_id: UserId, post_id: PostId) -> SocialResult<LikeToggle> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(SocialError::PostNotFound)?;

        let liked = if self.repo.remove_like(user_id, post_id).await? {
            false
        } else {
            let inserted = self.repo.insert_like(user_id, post_id).await?;
            if inserted {
                if let Some(notification) = Notification::for_like(&post, user_id) {
                    self.repo.insert_notification(&notification).await?;
                }
            }
            true
        };

        let like_count = self.repo.count_likes(post_id).await?;

        tracing::info!(
            post_id = %post_id,
            user_id = %user_id,
            liked,
            like_count,
            "Like toggled"
        );

        Ok(LikeToggle { liked, like_count })
    }

    pub async fn likers(&self, post_id: PostId, page: Page) -> SocialResult<Vec<UserSummary>> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(SocialError::PostNotFound);
        }
        self.repo.list_likers(post_id, page).await
    }
}
