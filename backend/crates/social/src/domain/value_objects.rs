//! Value Objects
//!
//! Validated inputs for the social domain.

use std::fmt;
use std::str::FromStr;

use kernel::error::app_error::{AppError, AppResult};
use kernel::validation::{bounded_text, optional_http_url};
use serde::{Deserialize, Serialize};

use crate::application::config::SocialConfig;

// ============================================================================
// Content
// ============================================================================

/// Post body: trimmed, non-empty, bounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    pub fn new(raw: &str, config: &SocialConfig) -> AppResult<Self> {
        bounded_text("content", raw, 1, config.max_post_length).map(Self)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Comment body: trimmed, non-empty, bounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(raw: &str, config: &SocialConfig) -> AppResult<Self> {
        bounded_text("content", raw, 1, config.max_comment_length).map(Self)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Optional image attached to a post; empty string means none
pub fn image_url(raw: Option<&str>, config: &SocialConfig) -> AppResult<Option<String>> {
    optional_http_url("imageUrl", raw, config.max_image_url_length)
}

/// User search term, stripped of surrounding whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str, config: &SocialConfig) -> AppResult<Self> {
        bounded_text("q", raw, 1, config.max_search_length).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern matching the term anywhere, with wildcards escaped
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Clamped `LIMIT`/`OFFSET` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Missing limit takes the default; out-of-range values are clamped
    pub fn new(limit: Option<i64>, offset: Option<i64>, config: &SocialConfig) -> Self {
        let limit = limit
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size);
        let offset = offset.unwrap_or(0).max(0);
        Self { limit, offset }
    }

    /// Bounds for slicing an in-memory list
    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(len);
        let end = start
            .saturating_add(usize::try_from(self.limit).unwrap_or(0))
            .min(len);
        start..end
    }
}

// ============================================================================
// Notification kind
// ============================================================================

/// What triggered a notification; stored as text in `notifications.kind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Follow => "follow",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(NotificationKind::Like),
            "comment" => Ok(NotificationKind::Comment),
            "follow" => Ok(NotificationKind::Follow),
            other => Err(AppError::internal(format!(
                "Unknown notification kind '{other}'"
            ))),
        }
    }
}
