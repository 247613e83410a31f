//! Application Configuration
//!
//! Limits for the social application layer.

/// Social application configuration
#[derive(Debug, Clone)]
pub struct SocialConfig {
    /// Page size when `limit` is omitted
    pub default_page_size: i64,
    /// Upper bound for `limit`
    pub max_page_size: i64,
    /// Post content length in characters
    pub max_post_length: usize,
    /// Comment content length in characters
    pub max_comment_length: usize,
    /// Post image URL length in characters
    pub max_image_url_length: usize,
    /// User search term length in characters
    pub max_search_length: usize,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            max_post_length: 2000,
            max_comment_length: 1000,
            max_image_url_length: 500,
            max_search_length: 50,
        }
    }
}

impl SocialConfig {
    /// Override page sizing; `max` is raised to at least `default`
    pub fn with_page_size(mut self, default: i64, max: i64) -> Self {
        self.default_page_size = default.max(1);
        self.max_page_size = max.max(self.default_page_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_page_size_keeps_bounds_consistent() {
        let config = SocialConfig::default().with_page_size(50, 10);
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.max_page_size, 50);

        let config = SocialConfig::default().with_page_size(0, 30);
        assert_eq!(config.default_page_size, 1);
        assert_eq!(config.max_page_size, 30);
    }
}
