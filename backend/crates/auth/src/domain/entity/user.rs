//! User Entity
//!
//! Account row: credentials plus the editable public profile.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, profile::ProfileChanges, user_name::UserName, user_password::UserPassword,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique handle, canonical lowercase
    pub user_name: UserName,
    /// Unique, lowercase; never shown to other users
    pub email: Email,
    pub password: UserPassword,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with an empty profile
    pub fn new(
        user_name: UserName,
        email: Email,
        password: UserPassword,
        display_name: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            password,
            display_name,
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a validated profile edit; returns whether anything changed
    pub fn apply_profile(&mut self, changes: ProfileChanges) -> bool {
        let before = (
            self.display_name.clone(),
            self.bio.clone(),
            self.avatar_url.clone(),
        );

        if let Some(display_name) = changes.display_name {
            self.display_name = display_name;
        }
        if let Some(bio) = changes.bio {
            self.bio = bio;
        }
        if let Some(avatar_url) = changes.avatar_url {
            self.avatar_url = avatar_url;
        }

        let changed = before != (self.display_name.clone(), self.bio.clone(), self.avatar_url.clone());
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}
