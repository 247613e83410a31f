//! PostgreSQL Repository Implementations
//!
//! Every read model is assembled in a single statement; counters are
//! correlated subqueries so a page of posts costs one round trip.

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, NotificationId, PostId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{
    Comment, CommentView, Notification, NotificationView, Post, PostView, UserProfile, UserSummary,
};
use crate::domain::repository::{
    CommentRepository, FollowRepository, LikeRepository, NotificationRepository, PostRepository,
    UserDirectory,
};
use crate::domain::value_objects::{NotificationKind, Page, SearchTerm};
use crate::error::{SocialError, SocialResult};

/// Post read model; `$1` is the viewer (NULL when anonymous)
const POST_VIEW_SELECT: &str = r#"
    SELECT
        p.post_id,
        p.content,
        p.image_url,
        p.created_at,
        p.updated_at,
        u.user_id AS author_id,
        u.user_name AS author_user_name,
        u.display_name AS author_display_name,
        u.avatar_url AS author_avatar_url,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.post_id) AS like_count,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.post_id) AS comment_count,
        EXISTS(
            SELECT 1 FROM likes l WHERE l.post_id = p.post_id AND l.user_id = $1
        ) AS liked_by_me
    FROM posts p
    JOIN users u ON u.user_id = p.user_id
"#;

const POST_ORDER: &str = "ORDER BY p.created_at DESC, p.post_id DESC";

const COMMENT_VIEW_SELECT: &str = r#"
    SELECT
        c.comment_id,
        c.post_id,
        c.content,
        c.created_at,
        u.user_id AS author_id,
        u.user_name AS author_user_name,
        u.display_name AS author_display_name,
        u.avatar_url AS author_avatar_url
    FROM comments c
    JOIN users u ON u.user_id = c.user_id
"#;

/// Profile read model; `$1` is the viewer (NULL when anonymous)
const PROFILE_SELECT: &str = r#"
    SELECT
        u.user_id,
        u.user_name,
        u.display_name,
        u.avatar_url,
        u.bio,
        u.created_at,
        (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.user_id) AS follower_count,
        (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.user_id) AS following_count,
        (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.user_id) AS post_count,
        EXISTS(
            SELECT 1 FROM follows f WHERE f.follower_id = $1 AND f.following_id = u.user_id
        ) AS is_following
    FROM users u
"#;

/// PostgreSQL-backed social repository
#[derive(Clone)]
pub struct PgSocialRepository {
    pool: PgPool,
}

impl PgSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Users reached through a relation aliased `r`, newest relation first
    async fn list_users(
        &self,
        from: &str,
        filter: &str,
        key: Uuid,
        page: Page,
    ) -> SocialResult<Vec<UserSummary>> {
        let sql = format!(
            r#"
            SELECT u.user_id, u.user_name, u.display_name, u.avatar_url
            FROM {from}
            WHERE {filter} = $1
            ORDER BY r.created_at DESC, u.user_id
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, UserSummaryRow>(&sql)
            .bind(key)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserSummaryRow::into_summary).collect())
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgSocialRepository {
    async fn insert_post(&self, post: &Post) -> SocialResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (post_id, user_id, content, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.author_id.as_uuid())
        .bind(&post.content)
        .bind(post.image_url.as_deref())
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_post(&self, post_id: PostId) -> SocialResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT post_id, user_id, content, image_url, created_at, updated_at
            FROM posts
            WHERE post_id = $1
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn post_view(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<PostView>> {
        let sql = format!("{POST_VIEW_SELECT} WHERE p.post_id = $2");
        let row = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(viewer.map(UserId::into_uuid))
            .bind(post_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostViewRow::into_view))
    }

    async fn list_posts(&self, viewer: Option<UserId>, page: Page) -> SocialResult<Vec<PostView>> {
        let sql = format!("{POST_VIEW_SELECT} {POST_ORDER} LIMIT $2 OFFSET $3");
        let rows = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(viewer.map(UserId::into_uuid))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostViewRow::into_view).collect())
    }

    async fn list_posts_by_author(
        &self,
        author_id: UserId,
        viewer: Option<UserId>,
        page: Page,
    ) -> SocialResult<Vec<PostView>> {
        let sql =
            format!("{POST_VIEW_SELECT} WHERE p.user_id = $2 {POST_ORDER} LIMIT $3 OFFSET $4");
        let rows = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(viewer.map(UserId::into_uuid))
            .bind(author_id.as_uuid())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostViewRow::into_view).collect())
    }

    async fn feed(&self, viewer: UserId, page: Page) -> SocialResult<Vec<PostView>> {
        let sql = format!(
            r#"
            {POST_VIEW_SELECT}
            WHERE p.user_id = $1
               OR p.user_id IN (SELECT following_id FROM follows WHERE follower_id = $1)
            {POST_ORDER}
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(Some(viewer.into_uuid()))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostViewRow::into_view).collect())
    }

    async fn update_post(&self, post: &Post) -> SocialResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET
                content = $2,
                image_url = $3,
                updated_at = $4
            WHERE post_id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.content)
        .bind(post.image_url.as_deref())
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SocialError::PostNotFound);
        }

        Ok(())
    }

    async fn delete_post(&self, post_id: PostId) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgSocialRepository {
    async fn insert_comment(&self, comment: &Comment) -> SocialResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, post_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.post_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_comment(&self, comment_id: CommentId) -> SocialResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT comment_id, post_id, user_id, content, created_at
            FROM comments
            WHERE comment_id = $1
            "#,
        )
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn comment_view(&self, comment_id: CommentId) -> SocialResult<Option<CommentView>> {
        let sql = format!("{COMMENT_VIEW_SELECT} WHERE c.comment_id = $1");
        let row = sqlx::query_as::<_, CommentViewRow>(&sql)
            .bind(comment_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CommentViewRow::into_view))
    }

    async fn list_comments(&self, post_id: PostId, page: Page) -> SocialResult<Vec<CommentView>> {
        let sql = format!(
            "{COMMENT_VIEW_SELECT} WHERE c.post_id = $1 \
             ORDER BY c.created_at ASC, c.comment_id ASC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, CommentViewRow>(&sql)
            .bind(post_id.as_uuid())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CommentViewRow::into_view).collect())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Like Repository Implementation
// ============================================================================

impl LikeRepository for PgSocialRepository {
    async fn remove_like(&self, user_id: UserId, post_id: PostId) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id.as_uuid())
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_like(&self, user_id: UserId, post_id: PostId) -> SocialResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (user_id, post_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(post_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_likes(&self, post_id: PostId) -> SocialResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_likers(&self, post_id: PostId, page: Page) -> SocialResult<Vec<UserSummary>> {
        self.list_users(
            "likes r JOIN users u ON u.user_id = r.user_id",
            "r.post_id",
            post_id.into_uuid(),
            page,
        )
        .await
    }
}

// ============================================================================
// Follow Repository Implementation
// ============================================================================

impl FollowRepository for PgSocialRepository {
    async fn remove_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id.as_uuid())
                .bind(following_id.as_uuid())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, following_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            "#,
        )
        .bind(follower_id.as_uuid())
        .bind(following_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_followers(&self, user_id: UserId) -> SocialResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE following_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_followers(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>> {
        self.list_users(
            "follows r JOIN users u ON u.user_id = r.follower_id",
            "r.following_id",
            user_id.into_uuid(),
            page,
        )
        .await
    }

    async fn list_following(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>> {
        self.list_users(
            "follows r JOIN users u ON u.user_id = r.following_id",
            "r.follower_id",
            user_id.into_uuid(),
            page,
        )
        .await
    }
}

// ============================================================================
// Notification Repository Implementation
// ============================================================================

impl NotificationRepository for PgSocialRepository {
    async fn insert_notification(&self, notification: &Notification) -> SocialResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                notification_id,
                recipient_id,
                actor_id,
                kind,
                post_id,
                comment_id,
                is_read,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.notification_id.as_uuid())
        .bind(notification.recipient_id.as_uuid())
        .bind(notification.actor_id.as_uuid())
        .bind(notification.kind.as_str())
        .bind(notification.post_id.map(PostId::into_uuid))
        .bind(notification.comment_id.map(CommentId::into_uuid))
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_notifications(
        &self,
        recipient_id: UserId,
        unread_only: bool,
        page: Page,
    ) -> SocialResult<Vec<NotificationView>> {
        let rows = sqlx::query_as::<_, NotificationViewRow>(
            r#"
            SELECT
                n.notification_id,
                n.kind,
                n.post_id,
                n.comment_id,
                n.is_read,
                n.created_at,
                u.user_id AS actor_id,
                u.user_name AS actor_user_name,
                u.display_name AS actor_display_name,
                u.avatar_url AS actor_avatar_url
            FROM notifications n
            JOIN users u ON u.user_id = n.actor_id
            WHERE n.recipient_id = $1
              AND (NOT $2 OR NOT n.is_read)
            ORDER BY n.created_at DESC, n.notification_id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(recipient_id.as_uuid())
        .bind(unread_only)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(NotificationViewRow::into_view).collect()
    }

    async fn count_unread(&self, recipient_id: UserId) -> SocialResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_read(
        &self,
        recipient_id: UserId,
        notification_id: NotificationId,
    ) -> SocialResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE notification_id = $1 AND recipient_id = $2",
        )
        .bind(notification_id.as_uuid())
        .bind(recipient_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> SocialResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// User Directory Implementation
// ============================================================================

impl UserDirectory for PgSocialRepository {
    async fn find_user_summary(&self, user_id: UserId) -> SocialResult<Option<UserSummary>> {
        let row = sqlx::query_as::<_, UserSummaryRow>(
            "SELECT user_id, user_name, display_name, avatar_url FROM users WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserSummaryRow::into_summary))
    }

    async fn find_profile(
        &self,
        user_id: UserId,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<UserProfile>> {
        let sql = format!("{PROFILE_SELECT} WHERE u.user_id = $2");
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(viewer.map(UserId::into_uuid))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn find_profile_by_name(
        &self,
        user_name: &str,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<UserProfile>> {
        let sql = format!("{PROFILE_SELECT} WHERE u.user_name = $2");
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(viewer.map(UserId::into_uuid))
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn search_users(&self, term: &SearchTerm, page: Page) -> SocialResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT user_id, user_name, display_name, avatar_url
            FROM users
            WHERE user_name ILIKE $1 OR display_name ILIKE $1
            ORDER BY user_name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(term.like_pattern())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummaryRow::into_summary).collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    user_id: Uuid,
    content: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            post_id: PostId::from_uuid(self.post_id),
            author_id: UserId::from_uuid(self.user_id),
            content: self.content,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostViewRow {
    post_id: Uuid,
    content: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Uuid,
    author_user_name: String,
    author_display_name: Option<String>,
    author_avatar_url: Option<String>,
    like_count: i64,
    comment_count: i64,
    liked_by_me: bool,
}

impl PostViewRow {
    fn into_view(self) -> PostView {
        PostView {
            post_id: PostId::from_uuid(self.post_id),
            author: UserSummary {
                user_id: UserId::from_uuid(self.author_id),
                user_name: self.author_user_name,
                display_name: self.author_display_name,
                avatar_url: self.author_avatar_url,
            },
            content: self.content,
            image_url: self.image_url,
            like_count: self.like_count,
            comment_count: self.comment_count,
            liked_by_me: self.liked_by_me,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: CommentId::from_uuid(self.comment_id),
            post_id: PostId::from_uuid(self.post_id),
            author_id: UserId::from_uuid(self.user_id),
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentViewRow {
    comment_id: Uuid,
    post_id: Uuid,
    content: String,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_user_name: String,
    author_display_name: Option<String>,
    author_avatar_url: Option<String>,
}

impl CommentViewRow {
    fn into_view(self) -> CommentView {
        CommentView {
            comment_id: CommentId::from_uuid(self.comment_id),
            post_id: PostId::from_uuid(self.post_id),
            author: UserSummary {
                user_id: UserId::from_uuid(self.author_id),
                user_name: self.author_user_name,
                display_name: self.author_display_name,
                avatar_url: self.author_avatar_url,
            },
            content: self.content,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationViewRow {
    notification_id: Uuid,
    kind: String,
    post_id: Option<Uuid>,
    comment_id: Option<Uuid>,
    is_read: bool,
    created_at: DateTime<Utc>,
    actor_id: Uuid,
    actor_user_name: String,
    actor_display_name: Option<String>,
    actor_avatar_url: Option<String>,
}

impl NotificationViewRow {
    fn into_view(self) -> SocialResult<NotificationView> {
        let kind = self
            .kind
            .parse::<NotificationKind>()
            .map_err(|e| SocialError::Internal(e.to_string()))?;

        Ok(NotificationView {
            notification_id: NotificationId::from_uuid(self.notification_id),
            kind,
            actor: UserSummary {
                user_id: UserId::from_uuid(self.actor_id),
                user_name: self.actor_user_name,
                display_name: self.actor_display_name,
                avatar_url: self.actor_avatar_url,
            },
            post_id: self.post_id.map(PostId::from_uuid),
            comment_id: self.comment_id.map(CommentId::from_uuid),
            is_read: self.is_read,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    user_id: Uuid,
    user_name: String,
    display_name: Option<String>,
    avatar_url: Option<String>,
}

impl UserSummaryRow {
    fn into_summary(self) -> UserSummary {
        UserSummary {
            user_id: UserId::from_uuid(self.user_id),
            user_name: self.user_name,
            display_name: self.display_name,
            avatar_url: self.avatar_url,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    user_name: String,
    display_name: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    follower_count: i64,
    following_count: i64,
    post_count: i64,
    is_following: bool,
}

impl ProfileRow {
    fn into_profile(self) -> UserProfile {
        UserProfile {
            summary: UserSummary {
                user_id: UserId::from_uuid(self.user_id),
                user_name: self.user_name,
                display_name: self.display_name,
                avatar_url: self.avatar_url,
            },
            bio: self.bio,
            created_at: self.created_at,
            follower_count: self.follower_count,
            following_count: self.following_count,
            post_count: self.post_count,
            is_following: self.is_following,
        }
    }
}
