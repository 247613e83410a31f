//! Notification Use Cases
//!
//! Every operation is scoped to the calling user's own notifications.

use std::sync::Arc;

use kernel::id::{NotificationId, UserId};

use crate::domain::entities::NotificationView;
use crate::domain::repository::NotificationRepository;
use crate::domain::value_objects::Page;
use crate::error::{SocialError, SocialResult};

pub struct NotificationUseCase<R>
where
    R: NotificationRepository,
{
    repo: Arc<R>,
}

impl<R> NotificationUseCase<R>
where
    R: NotificationRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        recipient_id: UserId,
        unread_only: bool,
        page: Page,
    ) -> SocialResult<Vec<NotificationView>> {
        self.repo
            .list_notifications(recipient_id, unread_only, page)
            .await
    }

    pub async fn unread_count(&self, recipient_id: UserId) -> SocialResult<i64> {
        self.repo.count_unread(recipient_id).await
    }

    /// Someone else's notification is reported as missing
    pub async fn mark_read(
        &self,
        recipient_id: UserId,
        notification_id: NotificationId,
    ) -> SocialResult<()> {
        if !self.repo.mark_read(recipient_id, notification_id).await? {
            return Err(SocialError::NotificationNotFound);
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, recipient_id: UserId) -> SocialResult<u64> {
        let updated = self.repo.mark_all_read(recipient_id).await?;
        tracing::debug!(recipient_id = %recipient_id, updated, "Notifications marked read");
        Ok(updated)
    }
}
