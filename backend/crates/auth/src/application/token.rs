//! Access Tokens
//!
//! Stateless bearer tokens of the form
//! `<user_uuid>.<expires_at_ms>.<base64url(HMAC-SHA256(key, "<user_uuid>.<expires_at_ms>"))>`.
//! Nothing is stored server-side; a token stays valid until it expires.

use kernel::id::UserId;
use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at_ms: i64,
}

/// Verified token payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub expires_at_ms: i64,
}

/// Sign a token for `user_id` valid for the configured TTL from `now_ms`
pub fn issue_access_token(config: &AuthConfig, user_id: UserId, now_ms: i64) -> AccessToken {
    let expires_at_ms = now_ms.saturating_add(config.token_ttl_ms());
    let payload = format!("{user_id}.{expires_at_ms}");
    let signature = hmac_sha256(&config.token_secret, payload.as_bytes());

    AccessToken {
        token: format!("{payload}.{}", to_base64_url(&signature)),
        user_id,
        expires_at_ms,
    }
}

/// Check signature, then shape, then expiry
pub fn verify_access_token(config: &AuthConfig, token: &str, now_ms: i64) -> AuthResult<TokenClaims> {
    let (payload, signature_b64) = token.rsplit_once('.').ok_or(AuthError::InvalidToken)?;
    let signature = from_base64_url(signature_b64).map_err(|_| AuthError::InvalidToken)?;

    if !verify_hmac_sha256(&config.token_secret, payload.as_bytes(), &signature) {
        return Err(AuthError::InvalidToken);
    }

    let (user_id, expires_at_ms) = payload.split_once('.').ok_or(AuthError::InvalidToken)?;
    let user_id: UserId = user_id.parse().map_err(|_| AuthError::InvalidToken)?;
    let expires_at_ms: i64 = expires_at_ms.parse().map_err(|_| AuthError::InvalidToken)?;

    if expires_at_ms <= now_ms {
        return Err(AuthError::TokenExpired);
    }

    Ok(TokenClaims {
        user_id,
        expires_at_ms,
    })
}
