//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod comments;
pub mod config;
pub mod feed;
pub mod follows;
pub mod likes;
pub mod notifications;
pub mod posts;
pub mod profiles;

// Re-exports
pub use comments::{AddCommentInput, CommentUseCase};
pub use config::SocialConfig;
pub use feed::FeedUseCase;
pub use follows::{FollowToggle, FollowUseCase};
pub use likes::{LikeToggle, LikeUseCase};
pub use notifications::NotificationUseCase;
pub use posts::{PostInput, PostUseCase};
pub use profiles::ProfileUseCase;
