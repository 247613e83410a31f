//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{CommentId, NotificationId, PostId, UserId};

use crate::domain::entities::{
    Comment, CommentView, Notification, NotificationView, Post, PostView, UserProfile, UserSummary,
};
use crate::domain::value_objects::{Page, SearchTerm};
use crate::error::SocialResult;

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn insert_post(&self, post: &Post) -> SocialResult<()>;

    async fn find_post(&self, post_id: PostId) -> SocialResult<Option<Post>>;

    /// Post with author and counters; `liked_by_me` is computed for `viewer`
    async fn post_view(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<PostView>>;

    /// Every post, newest first
    async fn list_posts(&self, viewer: Option<UserId>, page: Page) -> SocialResult<Vec<PostView>>;

    async fn list_posts_by_author(
        &self,
        author_id: UserId,
        viewer: Option<UserId>,
        page: Page,
    ) -> SocialResult<Vec<PostView>>;

    /// Posts by `viewer` or anyone `viewer` follows, newest first
    async fn feed(&self, viewer: UserId, page: Page) -> SocialResult<Vec<PostView>>;

    async fn update_post(&self, post: &Post) -> SocialResult<()>;

    /// Returns false if the post was already gone
    async fn delete_post(&self, post_id: PostId) -> SocialResult<bool>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn insert_comment(&self, comment: &Comment) -> SocialResult<()>;

    async fn find_comment(&self, comment_id: CommentId) -> SocialResult<Option<Comment>>;

    async fn comment_view(&self, comment_id: CommentId) -> SocialResult<Option<CommentView>>;

    /// Comments on a post, oldest first
    async fn list_comments(&self, post_id: PostId, page: Page) -> SocialResult<Vec<CommentView>>;

    async fn delete_comment(&self, comment_id: CommentId) -> SocialResult<bool>;
}

/// Like repository trait
#[trait_variant::make(LikeRepository: Send)]
pub trait LocalLikeRepository {
    /// Returns true if a like row was deleted
    async fn remove_like(&self, user_id: UserId, post_id: PostId) -> SocialResult<bool>;

    /// Returns true if a new row was written; an existing like is left alone
    async fn insert_like(&self, user_id: UserId, post_id: PostId) -> SocialResult<bool>;

    async fn count_likes(&self, post_id: PostId) -> SocialResult<i64>;

    /// Users who liked the post, most recent first
    async fn list_likers(&self, post_id: PostId, page: Page) -> SocialResult<Vec<UserSummary>>;
}

/// Follow repository trait
#[trait_variant::make(FollowRepository: Send)]
pub trait LocalFollowRepository {
    async fn remove_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool>;

    async fn insert_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool>;

    async fn count_followers(&self, user_id: UserId) -> SocialResult<i64>;

    async fn list_followers(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>>;

    async fn list_following(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>>;
}

/// Notification repository trait
#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    async fn insert_notification(&self, notification: &Notification) -> SocialResult<()>;

    /// Notifications for `recipient_id`, newest first
    async fn list_notifications(
        &self,
        recipient_id: UserId,
        unread_only: bool,
        page: Page,
    ) -> SocialResult<Vec<NotificationView>>;

    async fn count_unread(&self, recipient_id: UserId) -> SocialResult<i64>;

    /// Returns false unless the notification exists and belongs to `recipient_id`
    async fn mark_read(
        &self,
        recipient_id: UserId,
        notification_id: NotificationId,
    ) -> SocialResult<bool>;

    /// Returns the number of notifications flipped to read
    async fn mark_all_read(&self, recipient_id: UserId) -> SocialResult<u64>;
}

/// Read-only access to user data owned by the auth crate
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    async fn find_user_summary(&self, user_id: UserId) -> SocialResult<Option<UserSummary>>;

    async fn find_profile(
        &self,
        user_id: UserId,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<UserProfile>>;

    /// Lookup by canonical (lowercase) user name
    async fn find_profile_by_name(
        &self,
        user_name: &str,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<UserProfile>>;

    /// Case-insensitive match on user name or display name
    async fn search_users(&self, term: &SearchTerm, page: Page) -> SocialResult<Vec<UserSummary>>;
}

/// Everything the social router needs from one storage backend
pub trait SocialRepository:
    PostRepository
    + CommentRepository
    + LikeRepository
    + FollowRepository
    + NotificationRepository
    + UserDirectory
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> SocialRepository for T where
    T: PostRepository
        + CommentRepository
        + LikeRepository
        + FollowRepository
        + NotificationRepository
        + UserDirectory
        + Clone
        + Send
        + Sync
        + 'static
{
}
