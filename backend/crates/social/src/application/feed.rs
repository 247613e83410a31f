//! Feed Use Case
//!
//! The viewer's own posts merged with posts from everyone they follow.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::PostView;
use crate::domain::repository::PostRepository;
use crate::domain::value_objects::Page;
use crate::error::SocialResult;

pub struct FeedUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> FeedUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, viewer: UserId, page: Page) -> SocialResult<Vec<PostView>> {
        self.repo.feed(viewer, page).await
    }
}
