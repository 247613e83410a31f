//! Auth Middleware
//!
//! Bearer token middleware and the request-scoped identity extractors.
//!
//! - [`require_auth`]: rejects requests without a valid token
//! - [`attach_identity`]: anonymous requests pass, bad tokens are rejected
//! - [`CurrentUser`] / [`MaybeUser`]: read the identity in handlers

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::bearer::{BearerToken, extract_bearer};
use std::convert::Infallible;
use std::sync::Arc;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    async fn resolve(&self, token: &str) -> AuthResult<CurrentUser> {
        let use_case = AuthenticateUseCase::new(self.repo.clone(), self.config.clone());
        use_case.execute(token).await.map(CurrentUser::from)
    }
}

/// Authenticated caller, stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub user_name: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            user_name: user.user_name.into_inner(),
        }
    }
}

/// Optional caller for routes that also serve anonymous visitors
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|user| user.user_id)
    }
}

/// Middleware that requires a valid bearer token
pub async fn require_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let current = match extract_bearer(req.headers()) {
        BearerToken::Absent => return Err(AuthError::MissingToken),
        BearerToken::Malformed => return Err(AuthError::InvalidToken),
        BearerToken::Present(token) => state.resolve(&token).await?,
    };

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Middleware that attaches the caller when a token is sent
///
/// A request without `Authorization` continues anonymously; a token that is
/// sent but invalid is still a `401`.
pub async fn attach_identity<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    match extract_bearer(req.headers()) {
        BearerToken::Absent => {}
        BearerToken::Malformed => return Err(AuthError::InvalidToken),
        BearerToken::Present(token) => {
            let current = state.resolve(&token).await?;
            req.extensions_mut().insert(current);
        }
    }

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<CurrentUser>().cloned()))
    }
}
