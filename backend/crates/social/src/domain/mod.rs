//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Post, Comment, Notification) and their read models
//! - Domain value objects (PostContent, Page, NotificationKind)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;
