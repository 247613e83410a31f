//! HTTP-level tests for the social router
//!
//! One in-memory store backs both the social repositories and the auth
//! `UserRepository` the identity middleware resolves tokens against.

use std::sync::{Arc, Mutex};

use auth::application::issue_access_token;
use auth::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};
use auth::{AuthConfig, AuthError, AuthMiddlewareState, AuthResult, User, UserRepository};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::Utc;
use kernel::id::{CommentId, NotificationId, PostId, UserId};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::SocialConfig;
use crate::domain::entities::{
    Comment, CommentView, Notification, NotificationView, Post, PostView, UserProfile, UserSummary,
};
use crate::domain::repository::{
    CommentRepository, FollowRepository, LikeRepository, NotificationRepository, PostRepository,
    UserDirectory,
};
use crate::domain::value_objects::{Page, SearchTerm};
use crate::error::{SocialError, SocialResult};
use crate::presentation::router::social_router_generic;

const TOKEN_SECRET: [u8; 32] = [7u8; 32];

/// Any parseable PHC string will do; nobody logs in through this router
const PASSWORD_HASH: &str =
    "$argon2id$v=19$m=65536,t=2,p=1$gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct Store {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<(UserId, PostId)>,
    follows: Vec<(UserId, UserId)>,
    notifications: Vec<Notification>,
}

impl Store {
    fn summary(&self, user_id: UserId) -> Option<UserSummary> {
        self.users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| UserSummary {
                user_id: u.user_id,
                user_name: u.user_name.as_str().to_string(),
                display_name: u.display_name.clone(),
                avatar_url: u.avatar_url.clone(),
            })
    }

    fn post_view(&self, post: &Post, viewer: Option<UserId>) -> PostView {
        PostView {
            post_id: post.post_id,
            author: self.summary(post.author_id).unwrap(),
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            like_count: self.likes.iter().filter(|(_, p)| *p == post.post_id).count() as i64,
            comment_count: self
                .comments
                .iter()
                .filter(|c| c.post_id == post.post_id)
                .count() as i64,
            liked_by_me: viewer.is_some_and(|v| self.likes.contains(&(v, post.post_id))),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    /// Newest first, filtered
    fn post_views(
        &self,
        viewer: Option<UserId>,
        page: Page,
        keep: impl Fn(&Post) -> bool,
    ) -> Vec<PostView> {
        let views: Vec<PostView> = self
            .posts
            .iter()
            .rev()
            .filter(|p| keep(p))
            .map(|p| self.post_view(p, viewer))
            .collect();
        views[page.range(views.len())].to_vec()
    }

    fn comment_view(&self, comment: &Comment) -> CommentView {
        CommentView {
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            author: self.summary(comment.author_id).unwrap(),
            content: comment.content.clone(),
            created_at: comment.created_at,
        }
    }

    fn summaries(&self, ids: Vec<UserId>, page: Page) -> Vec<UserSummary> {
        let all: Vec<UserSummary> = ids.into_iter().filter_map(|id| self.summary(id)).collect();
        all[page.range(all.len())].to_vec()
    }

    fn profile(&self, user: &User, viewer: Option<UserId>) -> UserProfile {
        UserProfile {
            summary: self.summary(user.user_id).unwrap(),
            bio: user.bio.clone(),
            created_at: user.created_at,
            follower_count: self.follows.iter().filter(|(_, f)| *f == user.user_id).count() as i64,
            following_count: self.follows.iter().filter(|(f, _)| *f == user.user_id).count() as i64,
            post_count: self.posts.iter().filter(|p| p.author_id == user.user_id).count() as i64,
            is_following: viewer.is_some_and(|v| self.follows.contains(&(v, user.user_id))),
        }
    }
}

#[derive(Clone, Default)]
struct MemorySocial {
    store: Arc<Mutex<Store>>,
}

impl MemorySocial {
    fn add_user(&self, user_name: &str) -> UserId {
        let user = User::new(
            UserName::new(user_name).unwrap(),
            Email::new(format!("{user_name}@example.com")).unwrap(),
            UserPassword::from_phc_string(PASSWORD_HASH).unwrap(),
            Some(format!("{user_name} display")),
        );
        let user_id = user.user_id;
        self.store.lock().unwrap().users.push(user);
        user_id
    }

    fn notifications_for(&self, user_id: UserId) -> Vec<Notification> {
        let store = self.store.lock().unwrap();
        store
            .notifications
            .iter()
            .filter(|n| n.recipient_id == user_id)
            .cloned()
            .collect()
    }
}

impl UserRepository for MemorySocial {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.store.lock().unwrap().users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.user_id == *user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.user_name == *user_name).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.email == *email).cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().any(|u| u.user_name == *user_name))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().any(|u| u.email == *email))
    }

    async fn update_profile(&self, user: &User) -> AuthResult<()> {
        let mut store = self.store.lock().unwrap();
        let stored = store
            .users
            .iter_mut()
            .find(|u| u.user_id == user.user_id)
            .ok_or(AuthError::UserNotFound)?;
        *stored = user.clone();
        Ok(())
    }
}

impl PostRepository for MemorySocial {
    async fn insert_post(&self, post: &Post) -> SocialResult<()> {
        self.store.lock().unwrap().posts.push(post.clone());
        Ok(())
    }

    async fn find_post(&self, post_id: PostId) -> SocialResult<Option<Post>> {
        let store = self.store.lock().unwrap();
        Ok(store.posts.iter().find(|p| p.post_id == post_id).cloned())
    }

    async fn post_view(
        &self,
        post_id: PostId,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<PostView>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .posts
            .iter()
            .find(|p| p.post_id == post_id)
            .map(|p| store.post_view(p, viewer)))
    }

    async fn list_posts(&self, viewer: Option<UserId>, page: Page) -> SocialResult<Vec<PostView>> {
        let store = self.store.lock().unwrap();
        Ok(store.post_views(viewer, page, |_| true))
    }

    async fn list_posts_by_author(
        &self,
        author_id: UserId,
        viewer: Option<UserId>,
        page: Page,
    ) -> SocialResult<Vec<PostView>> {
        let store = self.store.lock().unwrap();
        Ok(store.post_views(viewer, page, |p| p.author_id == author_id))
    }

    async fn feed(&self, viewer: UserId, page: Page) -> SocialResult<Vec<PostView>> {
        let store = self.store.lock().unwrap();
        let follows = store.follows.clone();
        Ok(store.post_views(Some(viewer), page, |p| {
            p.author_id == viewer || follows.contains(&(viewer, p.author_id))
        }))
    }

    async fn update_post(&self, post: &Post) -> SocialResult<()> {
        let mut store = self.store.lock().unwrap();
        let stored = store
            .posts
            .iter_mut()
            .find(|p| p.post_id == post.post_id)
            .ok_or(SocialError::PostNotFound)?;
        *stored = post.clone();
        Ok(())
    }

    async fn delete_post(&self, post_id: PostId) -> SocialResult<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.posts.len();
        store.posts.retain(|p| p.post_id != post_id);
        store.comments.retain(|c| c.post_id != post_id);
        store.likes.retain(|(_, p)| *p != post_id);
        store.notifications.retain(|n| n.post_id != Some(post_id));
        Ok(store.posts.len() < before)
    }
}

impl CommentRepository for MemorySocial {
    async fn insert_comment(&self, comment: &Comment) -> SocialResult<()> {
        self.store.lock().unwrap().comments.push(comment.clone());
        Ok(())
    }

    async fn find_comment(&self, comment_id: CommentId) -> SocialResult<Option<Comment>> {
        let store = self.store.lock().unwrap();
        Ok(store.comments.iter().find(|c| c.comment_id == comment_id).cloned())
    }

    async fn comment_view(&self, comment_id: CommentId) -> SocialResult<Option<CommentView>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .comments
            .iter()
            .find(|c| c.comment_id == comment_id)
            .map(|c| store.comment_view(c)))
    }

    async fn list_comments(&self, post_id: PostId, page: Page) -> SocialResult<Vec<CommentView>> {
        let store = self.store.lock().unwrap();
        let views: Vec<CommentView> = store
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| store.comment_view(c))
            .collect();
        Ok(views[page.range(views.len())].to_vec())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> SocialResult<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.comments.len();
        store.comments.retain(|c| c.comment_id != comment_id);
        store.notifications.retain(|n| n.comment_id != Some(comment_id));
        Ok(store.comments.len() < before)
    }
}

impl LikeRepository for MemorySocial {
    async fn remove_like(&self, user_id: UserId, post_id: PostId) -> SocialResult<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.likes.len();
        store.likes.retain(|like| *like != (user_id, post_id));
        Ok(store.likes.len() < before)
    }

    async fn insert_like(&self, user_id: UserId, post_id: PostId) -> SocialResult<bool> {
        let mut store = self.store.lock().unwrap();
        if store.likes.contains(&(user_id, post_id)) {
            return Ok(false);
        }
        store.likes.push((user_id, post_id));
        Ok(true)
    }

    async fn count_likes(&self, post_id: PostId) -> SocialResult<i64> {
        let store = self.store.lock().unwrap();
        Ok(store.likes.iter().filter(|(_, p)| *p == post_id).count() as i64)
    }

    async fn list_likers(&self, post_id: PostId, page: Page) -> SocialResult<Vec<UserSummary>> {
        let store = self.store.lock().unwrap();
        let ids = store
            .likes
            .iter()
            .rev()
            .filter(|(_, p)| *p == post_id)
            .map(|(u, _)| *u)
            .collect();
        Ok(store.summaries(ids, page))
    }
}

impl FollowRepository for MemorySocial {
    async fn remove_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.follows.len();
        store.follows.retain(|f| *f != (follower_id, following_id));
        Ok(store.follows.len() < before)
    }

    async fn insert_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool> {
        let mut store = self.store.lock().unwrap();
        if store.follows.contains(&(follower_id, following_id)) {
            return Ok(false);
        }
        store.follows.push((follower_id, following_id));
        Ok(true)
    }

    async fn count_followers(&self, user_id: UserId) -> SocialResult<i64> {
        let store = self.store.lock().unwrap();
        Ok(store.follows.iter().filter(|(_, f)| *f == user_id).count() as i64)
    }

    async fn list_followers(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>> {
        let store = self.store.lock().unwrap();
        let ids = store
            .follows
            .iter()
            .rev()
            .filter(|(_, f)| *f == user_id)
            .map(|(follower, _)| *follower)
            .collect();
        Ok(store.summaries(ids, page))
    }

    async fn list_following(&self, user_id: UserId, page: Page) -> SocialResult<Vec<UserSummary>> {
        let store = self.store.lock().unwrap();
        let ids = store
            .follows
            .iter()
            .rev()
            .filter(|(f, _)| *f == user_id)
            .map(|(_, following)| *following)
            .collect();
        Ok(store.summaries(ids, page))
    }
}

impl NotificationRepository for MemorySocial {
    async fn insert_notification(&self, notification: &Notification) -> SocialResult<()> {
        self.store
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn list_notifications(
        &self,
        recipient_id: UserId,
        unread_only: bool,
        page: Page,
    ) -> SocialResult<Vec<NotificationView>> {
        let store = self.store.lock().unwrap();
        let views: Vec<NotificationView> = store
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id && (!unread_only || !n.is_read))
            .map(|n| NotificationView {
                notification_id: n.notification_id,
                kind: n.kind,
                actor: store.summary(n.actor_id).unwrap(),
                post_id: n.post_id,
                comment_id: n.comment_id,
                is_read: n.is_read,
                created_at: n.created_at,
            })
            .collect();
        Ok(views[page.range(views.len())].to_vec())
    }

    async fn count_unread(&self, recipient_id: UserId) -> SocialResult<i64> {
        let store = self.store.lock().unwrap();
        Ok(store
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_read(
        &self,
        recipient_id: UserId,
        notification_id: NotificationId,
    ) -> SocialResult<bool> {
        let mut store = self.store.lock().unwrap();
        match store
            .notifications
            .iter_mut()
            .find(|n| n.notification_id == notification_id && n.recipient_id == recipient_id)
        {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient_id: UserId) -> SocialResult<u64> {
        let mut store = self.store.lock().unwrap();
        let mut updated = 0;
        for n in store
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
        {
            n.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }
}

impl UserDirectory for MemorySocial {
    async fn find_user_summary(&self, user_id: UserId) -> SocialResult<Option<UserSummary>> {
        Ok(self.store.lock().unwrap().summary(user_id))
    }

    async fn find_profile(
        &self,
        user_id: UserId,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<UserProfile>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .map(|u| store.profile(u, viewer)))
    }

    async fn find_profile_by_name(
        &self,
        user_name: &str,
        viewer: Option<UserId>,
    ) -> SocialResult<Option<UserProfile>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .users
            .iter()
            .find(|u| u.user_name.as_str() == user_name)
            .map(|u| store.profile(u, viewer)))
    }

    async fn search_users(&self, term: &SearchTerm, page: Page) -> SocialResult<Vec<UserSummary>> {
        let store = self.store.lock().unwrap();
        let needle = term.as_str().to_lowercase();
        let mut matches: Vec<&User> = store
            .users
            .iter()
            .filter(|u| {
                u.user_name.as_str().contains(&needle)
                    || u
                        .display_name
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect();
        matches.sort_by(|a, b| a.user_name.as_str().cmp(b.user_name.as_str()));
        let ids = matches.into_iter().map(|u| u.user_id).collect();
        Ok(store.summaries(ids, page))
    }
}

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    router: Router,
    store: MemorySocial,
    auth_config: AuthConfig,
}

impl TestApp {
    fn new() -> Self {
        let store = MemorySocial::default();
        let auth_config = AuthConfig::new(TOKEN_SECRET);
        let identity =
            AuthMiddlewareState::new(Arc::new(store.clone()), Arc::new(auth_config.clone()));
        let router = social_router_generic(store.clone(), SocialConfig::default(), identity);
        Self {
            router,
            store,
            auth_config,
        }
    }

    /// Seed a user and return their id plus a valid bearer token
    fn user(&self, user_name: &str) -> (UserId, String) {
        let user_id = self.store.add_user(user_name);
        let token = issue_access_token(&self.auth_config, user_id, Utc::now().timestamp_millis());
        (user_id, token.token)
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn post(&self, token: &str, content: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/posts",
                Some(token),
                Some(json!({ "content": content })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["postId"].as_str().unwrap().to_string()
    }
}

fn contents(posts: &Value) -> Vec<&str> {
    posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["content"].as_str().unwrap())
        .collect()
}

fn user_names(users: &Value) -> Vec<&str> {
    users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["userName"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

mod post_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_post() {
        let app = TestApp::new();
        let (alice, token) = app.user("alice");

        let (status, body) = app
            .send(
                Method::POST,
                "/posts",
                Some(&token),
                Some(json!({ "content": "  first post  ", "imageUrl": "https://img.example.com/1.png" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], "first post");
        assert_eq!(body["author"]["userId"], alice.to_string());
        assert_eq!(body["author"]["userName"], "alice");
        assert_eq!(body["likeCount"], 0);
        assert_eq!(body["commentCount"], 0);
        assert_eq!(body["likedByMe"], false);

        let uri = format!("/posts/{}", body["postId"].as_str().unwrap());
        let (status, fetched) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["imageUrl"], "https://img.example.com/1.png");
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let app = TestApp::new();
        let (status, body) = app
            .send(Method::POST, "/posts", None, Some(json!({ "content": "hi" })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected_on_public_routes() {
        let app = TestApp::new();
        let (status, _) = app.send(Method::GET, "/posts", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_post_input() {
        let app = TestApp::new();
        let (_, token) = app.user("alice");

        for payload in [
            json!({ "content": "   " }),
            json!({ "content": "x".repeat(2001) }),
            json!({ "content": "ok", "imageUrl": "javascript:alert(1)" }),
        ] {
            let (status, body) = app
                .send(Method::POST, "/posts", Some(&token), Some(payload))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        }
        assert!(app.store.store.lock().unwrap().posts.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_ids() {
        let app = TestApp::new();

        let (status, _) = app.send(Method::GET, "/posts/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/posts/{}", PostId::new());
        let (status, body) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Post not found");
    }

    #[tokio::test]
    async fn test_only_author_can_edit_or_delete() {
        let app = TestApp::new();
        let (_, alice) = app.user("alice");
        let (_, bob) = app.user("bob");
        let post_id = app.post(&alice, "original").await;
        let uri = format!("/posts/{post_id}");

        let (status, _) = app
            .send(Method::PUT, &uri, Some(&bob), Some(json!({ "content": "hijacked" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.send(Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .send(Method::PUT, &uri, Some(&alice), Some(json!({ "content": "edited" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "edited");

        let (status, _) = app.send(Method::DELETE, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_comments_likes_and_notifications() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let (_, bob) = app.user("bob");
        let post_id = app.post(&alice, "soon gone").await;

        app.send(Method::POST, &format!("/posts/{post_id}/like"), Some(&bob), None)
            .await;
        app.send(
            Method::POST,
            &format!("/posts/{post_id}/comments"),
            Some(&bob),
            Some(json!({ "content": "nice" })),
        )
        .await;
        assert_eq!(app.store.notifications_for(alice_id).len(), 2);

        let (status, _) = app
            .send(Method::DELETE, &format!("/posts/{post_id}"), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let store = app.store.store.lock().unwrap();
        assert!(store.comments.is_empty());
        assert!(store.likes.is_empty());
        assert!(store.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_list_posts_newest_first_with_pagination() {
        let app = TestApp::new();
        let (_, alice) = app.user("alice");
        for content in ["one", "two", "three"] {
            app.post(&alice, content).await;
        }

        let (_, body) = app.send(Method::GET, "/posts", None, None).await;
        assert_eq!(contents(&body), ["three", "two", "one"]);

        let (_, body) = app.send(Method::GET, "/posts?limit=2", None, None).await;
        assert_eq!(contents(&body), ["three", "two"]);

        let (_, body) = app
            .send(Method::GET, "/posts?limit=2&offset=2", None, None)
            .await;
        assert_eq!(contents(&body), ["one"]);

        let (_, body) = app
            .send(Method::GET, "/posts?limit=0&offset=-3", None, None)
            .await;
        assert_eq!(contents(&body), ["three"]);
    }

    #[tokio::test]
    async fn test_list_user_posts() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let (_, bob) = app.user("bob");
        app.post(&alice, "by alice").await;
        app.post(&bob, "by bob").await;

        let (status, body) = app
            .send(Method::GET, &format!("/users/{alice_id}/posts"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(contents(&body), ["by alice"]);

        let (status, _) = app
            .send(Method::GET, &format!("/users/{}/posts", UserId::new()), None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod like_tests {
    use super::*;

    #[tokio::test]
    async fn test_like_toggle_and_notification() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let (bob_id, bob) = app.user("bob");
        let post_id = app.post(&alice, "like me").await;
        let like_uri = format!("/posts/{post_id}/like");

        let (status, body) = app.send(Method::POST, &like_uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "liked": true, "likeCount": 1 }));

        let notifications = app.store.notifications_for(alice_id);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].actor_id, bob_id);
        assert_eq!(notifications[0].post_id.unwrap().to_string(), post_id);

        let (_, viewed) = app
            .send(Method::GET, &format!("/posts/{post_id}"), Some(&bob), None)
            .await;
        assert_eq!(viewed["likedByMe"], true);
        let (_, anonymous) = app
            .send(Method::GET, &format!("/posts/{post_id}"), None, None)
            .await;
        assert_eq!(anonymous["likedByMe"], false);
        assert_eq!(anonymous["likeCount"], 1);

        let (_, body) = app.send(Method::POST, &like_uri, Some(&bob), None).await;
        assert_eq!(body, json!({ "liked": false, "likeCount": 0 }));

        // Unliking keeps the earlier notification
        assert_eq!(app.store.notifications_for(alice_id).len(), 1);
    }

    #[tokio::test]
    async fn test_self_like_does_not_notify() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let post_id = app.post(&alice, "mine").await;

        let (_, body) = app
            .send(Method::POST, &format!("/posts/{post_id}/like"), Some(&alice), None)
            .await;
        assert_eq!(body["liked"], true);
        assert!(app.store.notifications_for(alice_id).is_empty());
    }

    #[tokio::test]
    async fn test_like_missing_post() {
        let app = TestApp::new();
        let (_, bob) = app.user("bob");
        let (status, _) = app
            .send(Method::POST, &format!("/posts/{}/like", PostId::new()), Some(&bob), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_likers() {
        let app = TestApp::new();
        let (_, alice) = app.user("alice");
        let (_, bob) = app.user("bob");
        let (_, carol) = app.user("carol");
        let post_id = app.post(&alice, "popular").await;

        for token in [&bob, &carol] {
            app.send(Method::POST, &format!("/posts/{post_id}/like"), Some(token), None)
                .await;
        }

        let (status, body) = app
            .send(Method::GET, &format!("/posts/{post_id}/likes"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user_names(&body), ["carol", "bob"]);
    }
}

mod comment_tests {
    use super::*;

    #[tokio::test]
    async fn test_comment_notifies_post_author() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let (_, bob) = app.user("bob");
        let post_id = app.post(&alice, "talk to me").await;
        let uri = format!("/posts/{post_id}/comments");

        let (status, body) = app
            .send(Method::POST, &uri, Some(&bob), Some(json!({ "content": " hello " })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], "hello");
        assert_eq!(body["author"]["userName"], "bob");

        app.send(Method::POST, &uri, Some(&alice), Some(json!({ "content": "thanks" })))
            .await;

        let notifications = app.store.notifications_for(alice_id);
        assert_eq!(notifications.len(), 1);
        assert_eq!(
            notifications[0].comment_id.unwrap().to_string(),
            body["commentId"].as_str().unwrap()
        );

        let (_, listed) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(contents(&listed), ["hello", "thanks"]);

        let (_, post) = app
            .send(Method::GET, &format!("/posts/{post_id}"), None, None)
            .await;
        assert_eq!(post["commentCount"], 2);
    }

    #[tokio::test]
    async fn test_comment_validation_and_missing_post() {
        let app = TestApp::new();
        let (_, alice) = app.user("alice");
        let post_id = app.post(&alice, "p").await;

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/posts/{post_id}/comments"),
                Some(&alice),
                Some(json!({ "content": "y".repeat(1001) })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = format!("/posts/{}/comments", PostId::new());
        let (status, _) = app
            .send(Method::POST, &missing, Some(&alice), Some(json!({ "content": "hi" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send(Method::GET, &missing, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_comment_delete_permissions() {
        let app = TestApp::new();
        let (_, alice) = app.user("alice");
        let (_, bob) = app.user("bob");
        let (_, carol) = app.user("carol");
        let post_id = app.post(&alice, "thread").await;
        let uri = format!("/posts/{post_id}/comments");

        let mut ids = Vec::new();
        for content in ["first", "second"] {
            let (_, body) = app
                .send(Method::POST, &uri, Some(&bob), Some(json!({ "content": content })))
                .await;
            ids.push(body["commentId"].as_str().unwrap().to_string());
        }

        let (status, _) = app
            .send(Method::DELETE, &format!("/comments/{}", ids[0]), Some(&carol), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Comment author
        let (status, _) = app
            .send(Method::DELETE, &format!("/comments/{}", ids[0]), Some(&bob), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        // Post author
        let (status, _) = app
            .send(Method::DELETE, &format!("/comments/{}", ids[1]), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .send(Method::DELETE, &format!("/comments/{}", ids[1]), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod follow_tests {
    use super::*;

    #[tokio::test]
    async fn test_follow_toggle_and_lists() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let (bob_id, bob) = app.user("bob");
        let follow_uri = format!("/users/{bob_id}/follow");

        let (status, body) = app.send(Method::POST, &follow_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "following": true, "followerCount": 1 }));

        let notifications = app.store.notifications_for(bob_id);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].actor_id, alice_id);

        let (_, followers) = app
            .send(Method::GET, &format!("/users/{bob_id}/followers"), None, None)
            .await;
        assert_eq!(user_names(&followers), ["alice"]);

        let (_, following) = app
            .send(Method::GET, &format!("/users/{alice_id}/following"), None, None)
            .await;
        assert_eq!(user_names(&following), ["bob"]);

        let (_, body) = app.send(Method::POST, &follow_uri, Some(&alice), None).await;
        assert_eq!(body, json!({ "following": false, "followerCount": 0 }));

        let (_, body) = app
            .send(Method::POST, &format!("/users/{alice_id}/follow"), Some(&bob), None)
            .await;
        assert_eq!(body["following"], true);
    }

    #[tokio::test]
    async fn test_follow_self_and_missing_user() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");

        let (status, body) = app
            .send(Method::POST, &format!("/users/{alice_id}/follow"), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "You cannot follow yourself");

        let (status, _) = app
            .send(Method::POST, &format!("/users/{}/follow", UserId::new()), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(Method::GET, &format!("/users/{}/followers", UserId::new()), None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod feed_tests {
    use super::*;

    #[tokio::test]
    async fn test_feed_requires_token() {
        let app = TestApp::new();
        let (status, _) = app.send(Method::GET, "/feed", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_feed_merges_own_and_followed_posts() {
        let app = TestApp::new();
        let (_, alice) = app.user("alice");
        let (bob_id, bob) = app.user("bob");
        let (_, carol) = app.user("carol");

        app.post(&bob, "bob early").await;
        app.post(&carol, "carol stranger").await;
        app.post(&alice, "alice own").await;
        app.post(&bob, "bob late").await;

        let (_, body) = app.send(Method::GET, "/feed", Some(&alice), None).await;
        assert_eq!(contents(&body), ["alice own"]);

        app.send(Method::POST, &format!("/users/{bob_id}/follow"), Some(&alice), None)
            .await;

        let (status, body) = app.send(Method::GET, "/feed", Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(contents(&body), ["bob late", "alice own", "bob early"]);

        let (_, body) = app
            .send(Method::GET, "/feed?limit=1&offset=1", Some(&alice), None)
            .await;
        assert_eq!(contents(&body), ["alice own"]);
    }
}

mod notification_tests {
    use super::*;

    #[tokio::test]
    async fn test_unread_count_and_mark_read() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let (_, bob) = app.user("bob");
        let post_id = app.post(&alice, "ping").await;

        app.send(Method::POST, &format!("/posts/{post_id}/like"), Some(&bob), None)
            .await;
        app.send(Method::POST, &format!("/users/{alice_id}/follow"), Some(&bob), None)
            .await;

        let (_, body) = app
            .send(Method::GET, "/notifications/unread-count", Some(&alice), None)
            .await;
        assert_eq!(body, json!({ "count": 2 }));

        let (status, listed) = app
            .send(Method::GET, "/notifications", Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["kind"], "follow");
        assert_eq!(listed[0]["actor"]["userName"], "bob");
        assert!(listed[0]["postId"].is_null());
        assert_eq!(listed[1]["kind"], "like");
        assert_eq!(listed[1]["postId"], post_id);

        let first = listed[0]["notificationId"].as_str().unwrap();

        // Someone else's notification looks missing
        let (status, _) = app
            .send(Method::POST, &format!("/notifications/{first}/read"), Some(&bob), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(Method::POST, &format!("/notifications/{first}/read"), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, unread) = app
            .send(Method::GET, "/notifications?unreadOnly=true", Some(&alice), None)
            .await;
        assert_eq!(unread.as_array().unwrap().len(), 1);
        assert_eq!(unread[0]["kind"], "like");

        let (_, body) = app
            .send(Method::POST, "/notifications/read-all", Some(&alice), None)
            .await;
        assert_eq!(body, json!({ "updated": 1 }));

        let (_, body) = app
            .send(Method::GET, "/notifications/unread-count", Some(&alice), None)
            .await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_notifications_require_token() {
        let app = TestApp::new();
        let (status, _) = app.send(Method::GET, "/notifications", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, alice) = app.user("alice");
        let (status, _) = app
            .send(
                Method::POST,
                &format!("/notifications/{}/read", NotificationId::new()),
                Some(&alice),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod profile_tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_counters_and_is_following() {
        let app = TestApp::new();
        let (alice_id, alice) = app.user("alice");
        let (bob_id, bob) = app.user("bob");
        app.post(&alice, "hello").await;
        app.send(Method::POST, &format!("/users/{alice_id}/follow"), Some(&bob), None)
            .await;

        let uri = format!("/users/{alice_id}");
        let (status, body) = app.send(Method::GET, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userName"], "alice");
        assert_eq!(body["postCount"], 1);
        assert_eq!(body["followerCount"], 1);
        assert_eq!(body["followingCount"], 0);
        assert_eq!(body["isFollowing"], true);
        assert!(body.get("email").is_none());

        let (_, anonymous) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(anonymous["isFollowing"], false);

        let (_, bob_profile) = app
            .send(Method::GET, "/users/by-name/BOB", None, None)
            .await;
        assert_eq!(bob_profile["userId"], bob_id.to_string());
        assert_eq!(bob_profile["followingCount"], 1);

        let (status, _) = app
            .send(Method::GET, "/users/by-name/nobody", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_users() {
        let app = TestApp::new();
        app.user("alice");
        app.user("alicia");
        app.user("bob");

        let (status, body) = app.send(Method::GET, "/users/search?q=ALI", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user_names(&body), ["alice", "alicia"]);

        let (_, body) = app
            .send(Method::GET, "/users/search?q=ali&limit=1", None, None)
            .await;
        assert_eq!(user_names(&body), ["alice"]);

        let (status, _) = app.send(Method::GET, "/users/search?q=", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
