//! Comment Use Cases
//!
//! Adding a comment notifies the post author.

use std::sync::Arc;

use kernel::id::{CommentId, PostId, UserId};

use crate::application::config::SocialConfig;
use crate::domain::entities::{Comment, CommentView, Notification};
use crate::domain::repository::{CommentRepository, NotificationRepository, PostRepository};
use crate::domain::value_objects::{CommentContent, Page};
use crate::error::{SocialError, SocialResult};

pub struct AddCommentInput {
    pub content: String,
}

/// Comment use cases
pub struct CommentUseCase<R>
where
    R: PostRepository + CommentRepository + NotificationRepository,
{
    repo: Arc<R>,
    config: Arc<SocialConfig>,
}

impl<R> CommentUseCase<R>
where
    R: PostRepository + CommentRepository + NotificationRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<SocialConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn add(
        &self,
        author_id: UserId,
        post_id: PostId,
        input: AddCommentInput,
    ) -> SocialResult<CommentView> {
        let content = CommentContent::new(&input.content, &self.config)?;
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(SocialError::PostNotFound)?;

        let comment = Comment::new(post_id, author_id, content);
        self.repo.insert_comment(&comment).await?;

        if let Some(notification) = Notification::for_comment(&post, &comment) {
            self.repo.insert_notification(&notification).await?;
        }

        tracing::info!(
            comment_id = %comment.comment_id,
            post_id = %post_id,
            author_id = %author_id,
            "Comment added"
        );

        self.repo
            .comment_view(comment.comment_id)
            .await?
            .ok_or_else(|| {
                SocialError::Internal(format!("comment {} vanished after write", comment.comment_id))
            })
    }

    pub async fn list(&self, post_id: PostId, page: Page) -> SocialResult<Vec<CommentView>> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(SocialError::PostNotFound);
        }
        self.repo.list_comments(post_id, page).await
    }

    /// Allowed for the comment author and the author of the post it is on
    pub async fn delete(&self, actor_id: UserId, comment_id: CommentId) -> SocialResult<()> {
        let comment = self
            .repo
            .find_comment(comment_id)
            .await?
            .ok_or(SocialError::CommentNotFound)?;

        if comment.author_id != actor_id {
            let post_author = self
                .repo
                .find_post(comment.post_id)
                .await?
                .map(|post| post.author_id);
            if post_author != Some(actor_id) {
                return Err(SocialError::NotCommentOwner);
            }
        }

        if !self.repo.delete_comment(comment_id).await? {
            return Err(SocialError::CommentNotFound);
        }

        tracing::info!(comment_id = %comment_id, actor_id = %actor_id, "Comment deleted");
        Ok(())
    }
}
