//! Social Router

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

use auth::{AuthMiddlewareState, PgAuthRepository, UserRepository, attach_identity};

use crate::application::config::SocialConfig;
use crate::domain::repository::SocialRepository;
use crate::infra::postgres::PgSocialRepository;
use crate::presentation::handlers::{self, SocialAppState};

/// Create the Social router with PostgreSQL repositories
pub fn social_router(
    repo: PgSocialRepository,
    config: SocialConfig,
    identity: AuthMiddlewareState<PgAuthRepository>,
) -> Router {
    social_router_generic(repo, config, identity)
}

/// Create a generic Social router for any repository implementation
///
/// Every route runs behind [`attach_identity`]: anonymous requests pass,
/// requests with a bad token are rejected. Routes (relative to `/api`):
/// - `POST|GET /posts`, `GET|PUT|DELETE /posts/{post_id}`
/// - `POST|GET /posts/{post_id}/comments`, `DELETE /comments/{comment_id}`
/// - `POST /posts/{post_id}/like`, `GET /posts/{post_id}/likes`
/// - `GET /users/search`, `GET /users/by-name/{user_name}`, `GET /users/{user_id}`
/// - `GET /users/{user_id}/posts`, `POST /users/{user_id}/follow`
/// - `GET /users/{user_id}/followers`, `GET /users/{user_id}/following`
/// - `GET /feed`
/// - `GET /notifications`, `GET /notifications/unread-count`,
///   `POST /notifications/read-all`, `POST /notifications/{notification_id}/read`
pub fn social_router_generic<R, A>(
    repo: R,
    config: SocialConfig,
    identity: AuthMiddlewareState<A>,
) -> Router
where
    R: SocialRepository,
    A: UserRepository + Clone + Send + Sync + 'static,
{
    let state = SocialAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        // Posts
        .route(
            "/posts",
            post(handlers::create_post::<R>).get(handlers::list_posts::<R>),
        )
        .route(
            "/posts/{post_id}",
            get(handlers::get_post::<R>)
                .put(handlers::update_post::<R>)
                .delete(handlers::delete_post::<R>),
        )
        // Comments
        .route(
            "/posts/{post_id}/comments",
            post(handlers::add_comment::<R>).get(handlers::list_comments::<R>),
        )
        .route(
            "/comments/{comment_id}",
            delete(handlers::delete_comment::<R>),
        )
        // Likes
        .route("/posts/{post_id}/like", post(handlers::toggle_like::<R>))
        .route("/posts/{post_id}/likes", get(handlers::list_likers::<R>))
        // Users, profiles and follows
        .route("/users/search", get(handlers::search_users::<R>))
        .route(
            "/users/by-name/{user_name}",
            get(handlers::get_profile_by_name::<R>),
        )
        .route("/users/{user_id}", get(handlers::get_profile::<R>))
        .route("/users/{user_id}/posts", get(handlers::list_user_posts::<R>))
        .route("/users/{user_id}/follow", post(handlers::toggle_follow::<R>))
        .route(
            "/users/{user_id}/followers",
            get(handlers::list_followers::<R>),
        )
        .route(
            "/users/{user_id}/following",
            get(handlers::list_following::<R>),
        )
        // Feed
        .route("/feed", get(handlers::feed::<R>))
        // Notifications
        .route(
            "/notifications",
            get(handlers::list_notifications::<R>),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::unread_count::<R>),
        )
        .route(
            "/notifications/read-all",
            post(handlers::mark_all_read::<R>),
        )
        .route(
            "/notifications/{notification_id}/read",
            post(handlers::mark_read::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            identity,
            attach_identity::<A>,
        ))
        .with_state(state)
}
