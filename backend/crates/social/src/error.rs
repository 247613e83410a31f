//! Social Error Types
//!
//! Social-specific error variants that render through the unified
//! `kernel::error::AppError` problem format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Social-specific result type alias
pub type SocialResult<T> = Result<T, SocialError>;

/// Social-specific error variants
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Notification not found")]
    NotificationNotFound,

    /// Editing or deleting someone else's post
    #[error("Only the author can change this post")]
    NotPostAuthor,

    /// Deleting a comment that is neither yours nor on your post
    #[error("Only the comment author or the post author can delete this comment")]
    NotCommentOwner,

    #[error("You cannot follow yourself")]
    SelfFollow,

    /// Input rejected by validation (carries its own kind and message)
    #[error("{0}")]
    Rejected(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SocialError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::PostNotFound
            | SocialError::CommentNotFound
            | SocialError::UserNotFound
            | SocialError::NotificationNotFound => ErrorKind::NotFound,
            SocialError::NotPostAuthor | SocialError::NotCommentOwner => ErrorKind::Forbidden,
            SocialError::SelfFollow => ErrorKind::BadRequest,
            SocialError::Rejected(e) => e.kind(),
            SocialError::Database(_) | SocialError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            SocialError::Rejected(e) => e,
            SocialError::Database(e) => AppError::from(e),
            SocialError::Internal(msg) => AppError::internal("Internal server error")
                .with_source(std::io::Error::other(msg)),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            SocialError::Database(e) => {
                tracing::error!(error = %e, "Social database error");
            }
            SocialError::Internal(msg) => {
                tracing::error!(message = %msg, "Social internal error");
            }
            SocialError::NotPostAuthor | SocialError::NotCommentOwner => {
                tracing::warn!(error = %self, "Forbidden social action");
            }
            _ => {
                tracing::debug!(error = %self, "Social error");
            }
        }
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
