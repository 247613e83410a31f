//! HTTP Handlers
//!
//! Write routes take [`CurrentUser`] and answer `401` for anonymous callers.
//! Read routes take [`MaybeUser`] so `likedByMe` / `isFollowing` can be filled.

use std::sync::Arc;

use auth::{CurrentUser, MaybeUser};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kernel::error::app_error::AppError;
use kernel::id::Id;

use crate::application::config::SocialConfig;
use crate::application::{
    AddCommentInput, CommentUseCase, FeedUseCase, FollowUseCase, LikeUseCase, NotificationUseCase,
    PostInput, PostUseCase, ProfileUseCase,
};
use crate::domain::repository::SocialRepository;
use crate::domain::value_objects::Page;
use crate::error::SocialResult;
use crate::presentation::dto::{
    CommentRequest, CommentResponse, FollowToggleResponse, LikeToggleResponse,
    MarkAllReadResponse, NotificationQuery, NotificationResponse, PageQuery, PostRequest,
    PostResponse, ProfileResponse, SearchQuery, UnreadCountResponse, UserSummaryResponse, collect,
};

/// Shared state for social handlers
#[derive(Clone)]
pub struct SocialAppState<R>
where
    R: SocialRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<SocialConfig>,
}

impl<R> SocialAppState<R>
where
    R: SocialRepository,
{
    fn page(&self, limit: Option<i64>, offset: Option<i64>) -> Page {
        Page::new(limit, offset, &self.config)
    }
}

/// Malformed ids in the path are a `400`
fn parse_id<T>(raw: &str) -> SocialResult<Id<T>> {
    raw.parse::<Id<T>>()
        .map_err(|e| AppError::from(e).into())
}

// ============================================================================
// Posts
// ============================================================================

/// POST /api/posts
pub async fn create_post<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Json(req): Json<PostRequest>,
) -> SocialResult<(StatusCode, Json<PostResponse>)>
where
    R: SocialRepository,
{
    let use_case = PostUseCase::new(state.repo.clone(), state.config.clone());

    let view = use_case
        .create(
            current.user_id,
            PostInput {
                content: req.content,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

/// GET /api/posts
pub async fn list_posts<R>(
    State(state): State<SocialAppState<R>>,
    viewer: MaybeUser,
    Query(query): Query<PageQuery>,
) -> SocialResult<Json<Vec<PostResponse>>>
where
    R: SocialRepository,
{
    let use_case = PostUseCase::new(state.repo.clone(), state.config.clone());
    let posts = use_case
        .list(viewer.user_id(), state.page(query.limit, query.offset))
        .await?;

    Ok(Json(collect(posts)))
}

/// GET /api/posts/{post_id}
pub async fn get_post<R>(
    State(state): State<SocialAppState<R>>,
    viewer: MaybeUser,
    Path(post_id): Path<String>,
) -> SocialResult<Json<PostResponse>>
where
    R: SocialRepository,
{
    let post_id = parse_id(&post_id)?;
    let use_case = PostUseCase::new(state.repo.clone(), state.config.clone());

    Ok(Json(use_case.get(post_id, viewer.user_id()).await?.into()))
}

/// PUT /api/posts/{post_id}
pub async fn update_post<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Path(post_id): Path<String>,
    Json(req): Json<PostRequest>,
) -> SocialResult<Json<PostResponse>>
where
    R: SocialRepository,
{
    let post_id = parse_id(&post_id)?;
    let use_case = PostUseCase::new(state.repo.clone(), state.config.clone());

    let view = use_case
        .update(
            current.user_id,
            post_id,
            PostInput {
                content: req.content,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok(Json(view.into()))
}

/// DELETE /api/posts/{post_id}
pub async fn delete_post<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Path(post_id): Path<String>,
) -> SocialResult<StatusCode>
where
    R: SocialRepository,
{
    let post_id = parse_id(&post_id)?;
    let use_case = PostUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(current.user_id, post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{user_id}/posts
pub async fn list_user_posts<R>(
    State(state): State<SocialAppState<R>>,
    viewer: MaybeUser,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> SocialResult<Json<Vec<PostResponse>>>
where
    R: SocialRepository,
{
    let user_id = parse_id(&user_id)?;
    let use_case = PostUseCase::new(state.repo.clone(), state.config.clone());
    let posts = use_case
        .list_by_author(
            user_id,
            viewer.user_id(),
            state.page(query.limit, query.offset),
        )
        .await?;

    Ok(Json(collect(posts)))
}

// ============================================================================
// Comments
// ============================================================================

/// POST /api/posts/{post_id}/comments
pub async fn add_comment<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Path(post_id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> SocialResult<(StatusCode, Json<CommentResponse>)>
where
    R: SocialRepository,
{
    let post_id = parse_id(&post_id)?;
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());

    let view = use_case
        .add(
            current.user_id,
            post_id,
            AddCommentInput {
                content: req.content,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view.into())))
}

/// GET /api/posts/{post_id}/comments
pub async fn list_comments<R>(
    State(state): State<SocialAppState<R>>,
    Path(post_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> SocialResult<Json<Vec<CommentResponse>>>
where
    R: SocialRepository,
{
    let post_id = parse_id(&post_id)?;
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());
    let comments = use_case
        .list(post_id, state.page(query.limit, query.offset))
        .await?;

    Ok(Json(collect(comments)))
}

/// DELETE /api/comments/{comment_id}
pub async fn delete_comment<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Path(comment_id): Path<String>,
) -> SocialResult<StatusCode>
where
    R: SocialRepository,
{
    let comment_id = parse_id(&comment_id)?;
    let use_case = CommentUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(current.user_id, comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Likes
// ============================================================================

/// POST /api/posts/{post_id}/like
pub async fn toggle_like<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Path(post_id): Path<String>,
) -> SocialResult<Json<LikeToggleResponse>>
where
    R: SocialRepository,
{
    let post_id = parse_id(&post_id)?;
    let use_case = LikeUseCase::new(state.repo.clone());

    Ok(Json(use_case.toggle(current.user_id, post_id).await?.into()))
}

/// GET /api/posts/{post_id}/likes
pub async fn list_likers<R>(
    State(state): State<SocialAppState<R>>,
    Path(post_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> SocialResult<Json<Vec<UserSummaryResponse>>>
where
    R: SocialRepository,
{
    let post_id = parse_id(&post_id)?;
    let use_case = LikeUseCase::new(state.repo.clone());
    let users = use_case
        .likers(post_id, state.page(query.limit, query.offset))
        .await?;

    Ok(Json(collect(users)))
}

// ============================================================================
// Follows
// ============================================================================

/// POST /api/users/{user_id}/follow
pub async fn toggle_follow<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Path(user_id): Path<String>,
) -> SocialResult<Json<FollowToggleResponse>>
where
    R: SocialRepository,
{
    let target_id = parse_id(&user_id)?;
    let use_case = FollowUseCase::new(state.repo.clone());

    Ok(Json(use_case.toggle(current.user_id, target_id).await?.into()))
}

/// GET /api/users/{user_id}/followers
pub async fn list_followers<R>(
    State(state): State<SocialAppState<R>>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> SocialResult<Json<Vec<UserSummaryResponse>>>
where
    R: SocialRepository,
{
    let user_id = parse_id(&user_id)?;
    let use_case = FollowUseCase::new(state.repo.clone());
    let users = use_case
        .followers(user_id, state.page(query.limit, query.offset))
        .await?;

    Ok(Json(collect(users)))
}

/// GET /api/users/{user_id}/following
pub async fn list_following<R>(
    State(state): State<SocialAppState<R>>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> SocialResult<Json<Vec<UserSummaryResponse>>>
where
    R: SocialRepository,
{
    let user_id = parse_id(&user_id)?;
    let use_case = FollowUseCase::new(state.repo.clone());
    let users = use_case
        .following(user_id, state.page(query.limit, query.offset))
        .await?;

    Ok(Json(collect(users)))
}

// ============================================================================
// Feed
// ============================================================================

/// GET /api/feed
pub async fn feed<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Query(query): Query<PageQuery>,
) -> SocialResult<Json<Vec<PostResponse>>>
where
    R: SocialRepository,
{
    let use_case = FeedUseCase::new(state.repo.clone());
    let posts = use_case
        .execute(current.user_id, state.page(query.limit, query.offset))
        .await?;

    Ok(Json(collect(posts)))
}

// ============================================================================
// Notifications
// ============================================================================

/// GET /api/notifications
pub async fn list_notifications<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> SocialResult<Json<Vec<NotificationResponse>>>
where
    R: SocialRepository,
{
    let use_case = NotificationUseCase::new(state.repo.clone());
    let notifications = use_case
        .list(
            current.user_id,
            query.unread_only,
            state.page(query.limit, query.offset),
        )
        .await?;

    Ok(Json(collect(notifications)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
) -> SocialResult<Json<UnreadCountResponse>>
where
    R: SocialRepository,
{
    let use_case = NotificationUseCase::new(state.repo.clone());
    let count = use_case.unread_count(current.user_id).await?;

    Ok(Json(UnreadCountResponse { count }))
}

/// POST /api/notifications/{notification_id}/read
pub async fn mark_read<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
    Path(notification_id): Path<String>,
) -> SocialResult<StatusCode>
where
    R: SocialRepository,
{
    let notification_id = parse_id(&notification_id)?;
    let use_case = NotificationUseCase::new(state.repo.clone());
    use_case.mark_read(current.user_id, notification_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/notifications/read-all
pub async fn mark_all_read<R>(
    State(state): State<SocialAppState<R>>,
    current: CurrentUser,
) -> SocialResult<Json<MarkAllReadResponse>>
where
    R: SocialRepository,
{
    let use_case = NotificationUseCase::new(state.repo.clone());
    let updated = use_case.mark_all_read(current.user_id).await?;

    Ok(Json(MarkAllReadResponse { updated }))
}

// ============================================================================
// Profiles
// ============================================================================

/// GET /api/users/{user_id}
pub async fn get_profile<R>(
    State(state): State<SocialAppState<R>>,
    viewer: MaybeUser,
    Path(user_id): Path<String>,
) -> SocialResult<Json<ProfileResponse>>
where
    R: SocialRepository,
{
    let user_id = parse_id(&user_id)?;
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());

    Ok(Json(use_case.get_by_id(user_id, viewer.user_id()).await?.into()))
}

/// GET /api/users/by-name/{user_name}
pub async fn get_profile_by_name<R>(
    State(state): State<SocialAppState<R>>,
    viewer: MaybeUser,
    Path(user_name): Path<String>,
) -> SocialResult<Json<ProfileResponse>>
where
    R: SocialRepository,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());

    Ok(Json(
        use_case
            .get_by_name(&user_name, viewer.user_id())
            .await?
            .into(),
    ))
}

/// GET /api/users/search
pub async fn search_users<R>(
    State(state): State<SocialAppState<R>>,
    Query(query): Query<SearchQuery>,
) -> SocialResult<Json<Vec<UserSummaryResponse>>>
where
    R: SocialRepository,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let users = use_case
        .search(&query.q, state.page(query.limit, query.offset))
        .await?;

    Ok(Json(collect(users)))
}
