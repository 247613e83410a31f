//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, PrivateUserResponse, RegisterRequest, SessionResponse, UpdateProfileRequest,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<SessionResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            user_name: req.user_name,
            email: req.email,
            password: req.password,
            display_name: req.display_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(output.into())))
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<SessionResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            identifier: req.identifier,
            password: req.password,
        })
        .await?;

    Ok(Json(output.into()))
}

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
) -> AuthResult<Json<PrivateUserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = state
        .repo
        .find_by_id(&current.user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    Ok(Json(user.into()))
}

/// PATCH /api/auth/me
pub async fn update_me<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<PrivateUserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    let user = use_case
        .execute(
            current.user_id,
            UpdateProfileInput {
                display_name: req.display_name,
                bio: req.bio,
                avatar_url: req.avatar_url,
            },
        )
        .await?;

    Ok(Json(user.into()))
}
