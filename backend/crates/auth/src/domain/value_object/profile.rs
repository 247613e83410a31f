//! Profile fields a user edits about themselves
//!
//! Each field of a [`ProfileChanges`] is tri-state: `None` leaves the stored
//! value alone, `Some(None)` clears it (the client sent an empty string) and
//! `Some(Some(v))` replaces it.

use kernel::error::app_error::AppResult;
use kernel::validation::{optional_http_url, optional_text};

pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;
pub const BIO_MAX_LENGTH: usize = 300;
pub const AVATAR_URL_MAX_LENGTH: usize = 500;

/// Validated partial profile update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub display_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn new(
        display_name: Option<&str>,
        bio: Option<&str>,
        avatar_url: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            display_name: display_name
                .map(|v| validate_display_name(Some(v)))
                .transpose()?,
            bio: bio
                .map(|v| optional_text("bio", Some(v), BIO_MAX_LENGTH))
                .transpose()?,
            avatar_url: avatar_url
                .map(|v| optional_http_url("avatarUrl", Some(v), AVATAR_URL_MAX_LENGTH))
                .transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.bio.is_none() && self.avatar_url.is_none()
    }
}

/// Display name as accepted at registration and on profile edits
pub fn validate_display_name(value: Option<&str>) -> AppResult<Option<String>> {
    optional_text("displayName", value, DISPLAY_NAME_MAX_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_untouched() {
        let changes = ProfileChanges::new(None, None, None).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_empty_string_clears() {
        let changes = ProfileChanges::new(Some(""), Some("  "), None).unwrap();
        assert_eq!(changes.display_name, Some(None));
        assert_eq!(changes.bio, Some(None));
        assert_eq!(changes.avatar_url, None);
    }

    #[test]
    fn test_values_are_trimmed_and_checked() {
        let changes = ProfileChanges::new(
            Some(" Alice "),
            None,
            Some("https://img.example.com/alice.png"),
        )
        .unwrap();
        assert_eq!(changes.display_name, Some(Some("Alice".to_string())));
        assert!(
            changes
                .avatar_url
                .as_ref()
                .is_some_and(|url| url.as_deref() == Some("https://img.example.com/alice.png"))
        );

        assert!(ProfileChanges::new(Some(&"x".repeat(51)), None, None).is_err());
        assert!(ProfileChanges::new(None, Some(&"x".repeat(301)), None).is_err());
        assert!(ProfileChanges::new(None, None, Some("not a url")).is_err());
    }
}
