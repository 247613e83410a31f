//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{FollowToggle, LikeToggle};
use crate::domain::entities::{CommentView, NotificationView, PostView, UserProfile, UserSummary};
use crate::domain::value_objects::NotificationKind;

// ============================================================================
// Query strings
// ============================================================================

/// `?limit=&offset=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?unreadOnly=&limit=&offset=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?q=&limit=&offset=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ============================================================================
// Request bodies
// ============================================================================

/// Create or replace a post
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            user_id: summary.user_id.into_uuid(),
            user_name: summary.user_name,
            display_name: summary.display_name,
            avatar_url: summary.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: Uuid,
    pub author: UserSummaryResponse,
    pub content: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_me: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        Self {
            post_id: view.post_id.into_uuid(),
            author: view.author.into(),
            content: view.content,
            image_url: view.image_url,
            like_count: view.like_count,
            comment_count: view.comment_count,
            liked_by_me: view.liked_by_me,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub author: UserSummaryResponse,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            comment_id: view.comment_id.into_uuid(),
            post_id: view.post_id.into_uuid(),
            author: view.author.into(),
            content: view.content,
            created_at: view.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub like_count: i64,
}

impl From<LikeToggle> for LikeToggleResponse {
    fn from(toggle: LikeToggle) -> Self {
        Self {
            liked: toggle.liked,
            like_count: toggle.like_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowToggleResponse {
    pub following: bool,
    pub follower_count: i64,
}

impl From<FollowToggle> for FollowToggleResponse {
    fn from(toggle: FollowToggle) -> Self {
        Self {
            following: toggle.following,
            follower_count: toggle.follower_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub notification_id: Uuid,
    pub kind: NotificationKind,
    pub actor: UserSummaryResponse,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationView> for NotificationResponse {
    fn from(view: NotificationView) -> Self {
        Self {
            notification_id: view.notification_id.into_uuid(),
            kind: view.kind,
            actor: view.actor.into(),
            post_id: view.post_id.map(|id| id.into_uuid()),
            comment_id: view.comment_id.map(|id| id.into_uuid()),
            is_read: view.is_read,
            created_at: view.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// Public profile with counters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
    pub is_following: bool,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.summary.user_id.into_uuid(),
            user_name: profile.summary.user_name,
            display_name: profile.summary.display_name,
            avatar_url: profile.summary.avatar_url,
            bio: profile.bio,
            created_at: profile.created_at,
            follower_count: profile.follower_count,
            following_count: profile.following_count,
            post_count: profile.post_count,
            is_following: profile.is_following,
        }
    }
}

/// Convert a list of read models into their response type
pub fn collect<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}
