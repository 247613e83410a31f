//! Post Use Cases
//!
//! Create, read, edit and delete posts. Only the author may edit or delete.

use std::sync::Arc;

use kernel::id::{PostId, UserId};

use crate::application::config::SocialConfig;
use crate::domain::entities::{Post, PostView};
use crate::domain::repository::{PostRepository, UserDirectory};
use crate::domain::value_objects::{Page, PostContent, image_url};
use crate::error::{SocialError, SocialResult};

/// Post body as received from the client
pub struct PostInput {
    pub content: String,
    pub image_url: Option<String>,
}

impl PostInput {
    fn validate(&self, config: &SocialConfig) -> SocialResult<(PostContent, Option<String>)> {
        let content = PostContent::new(&self.content, config)?;
        let image_url = image_url(self.image_url.as_deref(), config)?;
        Ok((content, image_url))
    }
}

/// Post use cases
pub struct PostUseCase<R>
where
    R: PostRepository + UserDirectory,
{
    repo: Arc<R>,
    config: Arc<SocialConfig>,
}

impl<R> PostUseCase<R>
where
    R: PostRepository + UserDirectory,
{
    pub fn new(repo: Arc<R>, config: Arc<SocialConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn create(&self, author_id: UserId, input: PostInput) -> SocialResult<PostView> {
        let (content, image_url) = input.validate(&self.config)?;
        let post = Post::new(author_id, content, image_url);

        self.repo.insert_post(&post).await?;

        tracing::info!(post_id = %post.post_id, author_id = %author_id, "Post created");

        self.view_after_write(post.post_id, author_id).await
    }

    pub async fn get(&self, post_id: PostId, viewer: Option<UserId>) -> SocialResult<PostView> {
        self.repo
            .post_view(post_id, viewer)
            .await?
            .ok_or(SocialError::PostNotFound)
    }

    pub async fn list(&self, viewer: Option<UserId>, page: Page) -> SocialResult<Vec<PostView>> {
        self.repo.list_posts(viewer, page).await
    }

    pub async fn list_by_author(
        &self,
        author_id: UserId,
        viewer: Option<UserId>,
        page: Page,
    ) -> SocialResult<Vec<PostView>> {
        if self.repo.find_user_summary(author_id).await?.is_none() {
            return Err(SocialError::UserNotFound);
        }
        self.repo.list_posts_by_author(author_id, viewer, page).await
    }

    pub async fn update(
        &self,
        actor_id: UserId,
        post_id: PostId,
        input: PostInput,
    ) -> SocialResult<PostView> {
        let (content, image_url) = input.validate(&self.config)?;
        let mut post = self.owned_post(actor_id, post_id).await?;

        post.edit(content, image_url);
        self.repo.update_post(&post).await?;

        tracing::info!(post_id = %post_id, "Post updated");

        self.view_after_write(post_id, actor_id).await
    }

    pub async fn delete(&self, actor_id: UserId, post_id: PostId) -> SocialResult<()> {
        self.owned_post(actor_id, post_id).await?;

        if !self.repo.delete_post(post_id).await? {
            return Err(SocialError::PostNotFound);
        }

        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    async fn owned_post(&self, actor_id: UserId, post_id: PostId) -> SocialResult<Post> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(SocialError::PostNotFound)?;

        if !post.is_authored_by(actor_id) {
            return Err(SocialError::NotPostAuthor);
        }
        Ok(post)
    }

    async fn view_after_write(&self, post_id: PostId, viewer: UserId) -> SocialResult<PostView> {
        self.repo
            .post_view(post_id, Some(viewer))
            .await?
            .ok_or_else(|| SocialError::Internal(format!("post {post_id} vanished after write")))
    }
}
