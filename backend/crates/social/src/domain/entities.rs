//! Domain Entities
//!
//! Write models for posts, comments and notifications, plus the read models
//! the queries assemble with author details and counters.

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, NotificationId, PostId, UserId};

use crate::domain::value_objects::{CommentContent, NotificationKind, PostContent};

// ============================================================================
// Write models
// ============================================================================

/// A post as stored in `posts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: UserId, content: PostContent, image_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            post_id: PostId::new(),
            author_id,
            content: content.into_inner(),
            image_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Replace body and image, bumping `updated_at`
    pub fn edit(&mut self, content: PostContent, image_url: Option<String>) {
        self.content = content.into_inner();
        self.image_url = image_url;
        self.updated_at = Utc::now();
    }
}

/// A comment as stored in `comments`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: PostId, author_id: UserId, content: CommentContent) -> Self {
        Self {
            comment_id: CommentId::new(),
            post_id,
            author_id,
            content: content.into_inner(),
            created_at: Utc::now(),
        }
    }
}

/// A notification as stored in `notifications`
///
/// The constructors return `None` when the actor is also the recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub notification_id: NotificationId,
    pub recipient_id: UserId,
    pub actor_id: UserId,
    pub kind: NotificationKind,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn build(
        recipient_id: UserId,
        actor_id: UserId,
        kind: NotificationKind,
        post_id: Option<PostId>,
        comment_id: Option<CommentId>,
    ) -> Option<Self> {
        (recipient_id != actor_id).then(|| Self {
            notification_id: NotificationId::new(),
            recipient_id,
            actor_id,
            kind,
            post_id,
            comment_id,
            is_read: false,
            created_at: Utc::now(),
        })
    }

    pub fn for_like(post: &Post, actor_id: UserId) -> Option<Self> {
        Self::build(
            post.author_id,
            actor_id,
            NotificationKind::Like,
            Some(post.post_id),
            None,
        )
    }

    pub fn for_comment(post: &Post, comment: &Comment) -> Option<Self> {
        Self::build(
            post.author_id,
            comment.author_id,
            NotificationKind::Comment,
            Some(post.post_id),
            Some(comment.comment_id),
        )
    }

    pub fn for_follow(followed_id: UserId, actor_id: UserId) -> Option<Self> {
        Self::build(followed_id, actor_id, NotificationKind::Follow, None, None)
    }
}

// ============================================================================
// Read models
// ============================================================================

/// Public identity shown next to posts, comments and notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub user_id: UserId,
    pub user_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post_id: PostId,
    pub author: UserSummary,
    pub content: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    /// Always false for anonymous viewers
    pub liked_by_me: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author: UserSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub notification_id: NotificationId,
    pub kind: NotificationKind,
    pub actor: UserSummary,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub summary: UserSummary,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
    /// Whether the viewer follows this user; false when anonymous
    pub is_following: bool,
}
